/// A named, user-facing feed. Every channel except conversations is built
/// once per repository and lives in the fixed registry; a conversation is a
/// standalone handle constructed per message thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Every category, read and unread alike.
    All,
    /// Every category, restricted to unread items. Backed by its own
    /// sources: the unread restriction is a remote fetch parameter, so the
    /// unread caches are independent of the unfiltered ones.
    Unread,
    Replies,
    Mentions,
    Messages,
    /// Post and comment reports together.
    Reports,
}
