pub mod category;
pub mod retry;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{InboxItem, ItemId};

pub use category::CategoryFetch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    New,
    Old,
}

/// Parameters for one remote listing call. `force` asks the transport to
/// bypass any response cache it keeps on its side; a list shorter than
/// `limit` is the only "no more pages" signal.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub unread_only: bool,
    pub sort: SortOrder,
    pub force: bool,
}

/// The remote API boundary: one paginated listing call per item category
/// plus the category-specific read-state mutations. Implementations own the
/// wire format and authentication; the engine only sees domain items.
#[async_trait]
pub trait InboxClient: Send + Sync {
    async fn list_replies(&self, query: &PageQuery) -> Result<Vec<InboxItem>>;
    async fn list_mentions(&self, query: &PageQuery) -> Result<Vec<InboxItem>>;
    async fn list_messages(&self, query: &PageQuery) -> Result<Vec<InboxItem>>;
    async fn list_post_reports(&self, query: &PageQuery) -> Result<Vec<InboxItem>>;
    async fn list_comment_reports(&self, query: &PageQuery) -> Result<Vec<InboxItem>>;

    async fn mark_reply_read(&self, id: ItemId, read: bool) -> Result<()>;
    async fn mark_mention_read(&self, id: ItemId, read: bool) -> Result<()>;
    async fn mark_message_read(&self, id: ItemId, read: bool) -> Result<()>;
    async fn resolve_post_report(&self, id: ItemId, resolved: bool) -> Result<()>;
    async fn resolve_comment_report(&self, id: ItemId, resolved: bool) -> Result<()>;
}

/// What an `ItemSource` actually consumes: one homogeneous, remotely
/// paginated collection. [`CategoryFetch`] adapts the client's category
/// listings; conversation threads supply their own implementation.
#[async_trait]
pub trait PageFetch: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32, force: bool) -> Result<Vec<InboxItem>>;
}
