use serde::{Deserialize, Serialize};

use crate::domain::{InboxItem, ItemId};

/// Items per page for every registry channel.
pub const PAGE_SIZE: u32 = 20;

/// Items per page for one-person message threads.
pub const CONVERSATION_PAGE_SIZE: u32 = 50;

/// One window of a feed. `has_more` stays true until a fetch has actually
/// observed the end of the remote collection *and* the window reaches the
/// end of what is cached; a full page therefore always reports more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<InboxItem>,
    pub has_more: bool,
}

impl Page {
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id()).collect()
    }
}
