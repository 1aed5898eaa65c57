//! # Estuary
//!
//! A unified inbox aggregation engine: merges several independently
//! paginated remote collections (replies, mentions, private messages, post
//! reports, comment reports) into single, consistently time-ordered feeds,
//! with local caching, incremental re-fetch, forced refresh, and cross-feed
//! read-state synchronization.
//!
//! ## Architecture
//!
//! Three layers, each depending only on the one below it:
//!
//! ```text
//! InboxClient → ItemSource → MergeStream → InboxRepository → UI
//! ```
//!
//! - [`source::ItemSource`]: a gapless, deduplicated, cursor-paginated cache
//!   over one remote collection, with origin-page invalidation.
//! - [`merge::MergeStream`]: a lazy k-way merge of several sources into one
//!   feed ordered descending by update time, via a peek-then-advance
//!   protocol that never fetches more than the requested window needs.
//! - [`repository::InboxRepository`]: the channel façade. One merge stream
//!   per named [`domain::Channel`], plus cross-channel read-state
//!   consistency: optimistic local apply, authoritative remote call, commit
//!   or roll back.
//!
//! The remote API client is an external collaborator, abstracted behind
//! [`client::InboxClient`]; the engine never sees wire formats or
//! authentication.
//!
//! ## Modules
//!
//! - [`app`]: error taxonomy and `Result` alias
//! - [`domain`]: core domain models (`InboxItem`, `Category`, `Page`,
//!   `Channel`)
//! - [`client`]: the remote boundary traits and the per-category fetch
//!   adapter with bounded retry
//! - [`source`]: single-collection paginated cache
//! - [`merge`]: k-way time-ordered merge
//! - [`repository`]: channel registry, mutation worker, conversations

/// Error taxonomy.
///
/// [`EstuaryError`](app::EstuaryError) distinguishes transient network
/// failures (retried for page fetches), authorization failures (mapped to
/// empty pages for report listings), and mid-merge peek failures.
pub mod app;

/// The remote API boundary.
///
/// - [`InboxClient`](client::InboxClient): one listing call per category
///   plus the category-specific read-state mutations
/// - [`PageFetch`](client::PageFetch): what an `ItemSource` consumes
/// - [`CategoryFetch`](client::CategoryFetch): adapts one
///   (category, unread-only) pair of the client into a page fetch
pub mod client;

/// Core domain models.
///
/// - [`InboxItem`](domain::InboxItem): a single inbox entry, tagged by
///   category, ordered by `last_update`
/// - [`Channel`](domain::Channel): a named, user-facing feed
/// - [`Page`](domain::Page): one window of a feed
pub mod domain;

/// K-way time-ordered merge across sources.
///
/// [`MergeStream`](merge::MergeStream) pulls lazily from whichever source
/// currently holds the next item in order; already-returned pages are
/// prefix-stable between forces.
pub mod merge;

/// The channel façade.
///
/// [`InboxRepository`](repository::InboxRepository) resolves channels to
/// merge streams, serializes mutations on a single worker task, announces
/// unread-count changes, and hands out per-thread
/// [`Conversation`](repository::Conversation) handles.
pub mod repository;

/// Single-collection paginated cache.
///
/// [`ItemSource`](source::ItemSource) owns its cache, seen-set, and remote
/// cursor; forced refreshes invalidate whole origin pages, never single
/// items.
pub mod source;
