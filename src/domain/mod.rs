pub mod channel;
pub mod item;
pub mod page;

pub use channel::Channel;
pub use item::{
    Category, CommentReportItem, InboxItem, ItemId, MentionItem, MessageItem, PostReportItem,
    ReplyItem,
};
pub use page::{Page, CONVERSATION_PAGE_SIZE, PAGE_SIZE};
