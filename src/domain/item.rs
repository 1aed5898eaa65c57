use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique within a category only. Two items from different categories may
/// legitimately share an id without being the same thing.
pub type ItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Reply,
    Mention,
    Message,
    PostReport,
    CommentReport,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Reply,
        Category::Mention,
        Category::Message,
        Category::PostReport,
        Category::CommentReport,
    ];

    pub fn is_report(self) -> bool {
        matches!(self, Category::PostReport | Category::CommentReport)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Reply => "reply",
            Category::Mention => "mention",
            Category::Message => "message",
            Category::PostReport => "post report",
            Category::CommentReport => "comment report",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyItem {
    pub id: ItemId,
    pub last_update: DateTime<Utc>,
    pub is_read: bool,
    pub author: String,
    pub content: String,
    pub post_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionItem {
    pub id: ItemId,
    pub last_update: DateTime<Utc>,
    pub is_read: bool,
    pub author: String,
    pub content: String,
    pub post_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageItem {
    pub id: ItemId,
    pub last_update: DateTime<Utc>,
    pub is_read: bool,
    pub sender: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReportItem {
    pub id: ItemId,
    pub last_update: DateTime<Utc>,
    pub is_read: bool,
    pub reporter: String,
    pub post_title: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentReportItem {
    pub id: ItemId,
    pub last_update: DateTime<Utc>,
    pub is_read: bool,
    pub reporter: String,
    pub comment: String,
    pub reason: String,
}

/// A single inbox entry, tagged by category. The engine only ever touches
/// the three shared fields (`id`, `last_update`, `is_read`); everything else
/// is opaque payload carried through to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InboxItem {
    Reply(ReplyItem),
    Mention(MentionItem),
    Message(MessageItem),
    PostReport(PostReportItem),
    CommentReport(CommentReportItem),
}

impl InboxItem {
    pub fn id(&self) -> ItemId {
        match self {
            InboxItem::Reply(item) => item.id,
            InboxItem::Mention(item) => item.id,
            InboxItem::Message(item) => item.id,
            InboxItem::PostReport(item) => item.id,
            InboxItem::CommentReport(item) => item.id,
        }
    }

    /// The field the feeds are ordered by, descending (newest first).
    pub fn last_update(&self) -> DateTime<Utc> {
        match self {
            InboxItem::Reply(item) => item.last_update,
            InboxItem::Mention(item) => item.last_update,
            InboxItem::Message(item) => item.last_update,
            InboxItem::PostReport(item) => item.last_update,
            InboxItem::CommentReport(item) => item.last_update,
        }
    }

    /// For reports this means "resolved".
    pub fn is_read(&self) -> bool {
        match self {
            InboxItem::Reply(item) => item.is_read,
            InboxItem::Mention(item) => item.is_read,
            InboxItem::Message(item) => item.is_read,
            InboxItem::PostReport(item) => item.is_read,
            InboxItem::CommentReport(item) => item.is_read,
        }
    }

    pub fn set_read(&mut self, read: bool) {
        match self {
            InboxItem::Reply(item) => item.is_read = read,
            InboxItem::Mention(item) => item.is_read = read,
            InboxItem::Message(item) => item.is_read = read,
            InboxItem::PostReport(item) => item.is_read = read,
            InboxItem::CommentReport(item) => item.is_read = read,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            InboxItem::Reply(_) => Category::Reply,
            InboxItem::Mention(_) => Category::Mention,
            InboxItem::Message(_) => Category::Message,
            InboxItem::PostReport(_) => Category::PostReport,
            InboxItem::CommentReport(_) => Category::CommentReport,
        }
    }
}
