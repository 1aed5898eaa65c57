//! Scripted in-memory doubles for the remote boundary, shared by the
//! source, merge, and repository tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::{EstuaryError, Result};
use crate::client::{InboxClient, PageFetch, PageQuery};
use crate::domain::{Category, InboxItem, ItemId};

/// Item constructors used across the test modules. Timestamps are plain
/// epoch seconds so orderings read literally in the tests.
pub(crate) mod items {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::domain::{
        CommentReportItem, InboxItem, ItemId, MentionItem, MessageItem, PostReportItem, ReplyItem,
    };

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    pub(crate) fn reply(id: ItemId, seconds: i64) -> InboxItem {
        InboxItem::Reply(ReplyItem {
            id,
            last_update: ts(seconds),
            is_read: false,
            author: format!("author-{id}"),
            content: "a reply".into(),
            post_title: "a post".into(),
        })
    }

    pub(crate) fn mention(id: ItemId, seconds: i64) -> InboxItem {
        InboxItem::Mention(MentionItem {
            id,
            last_update: ts(seconds),
            is_read: false,
            author: format!("author-{id}"),
            content: "a mention".into(),
            post_title: "a post".into(),
        })
    }

    pub(crate) fn message(id: ItemId, seconds: i64) -> InboxItem {
        InboxItem::Message(MessageItem {
            id,
            last_update: ts(seconds),
            is_read: false,
            sender: format!("sender-{id}"),
            content: "a message".into(),
        })
    }

    pub(crate) fn post_report(id: ItemId, seconds: i64) -> InboxItem {
        InboxItem::PostReport(PostReportItem {
            id,
            last_update: ts(seconds),
            is_read: false,
            reporter: format!("reporter-{id}"),
            post_title: "a post".into(),
            reason: "spam".into(),
        })
    }

    pub(crate) fn comment_report(id: ItemId, seconds: i64) -> InboxItem {
        InboxItem::CommentReport(CommentReportItem {
            id,
            last_update: ts(seconds),
            is_read: false,
            reporter: format!("reporter-{id}"),
            comment: "a comment".into(),
            reason: "spam".into(),
        })
    }

    pub(crate) fn replies(entries: &[(ItemId, i64)]) -> Vec<InboxItem> {
        entries.iter().map(|&(id, s)| reply(id, s)).collect()
    }

    pub(crate) fn mentions(entries: &[(ItemId, i64)]) -> Vec<InboxItem> {
        entries.iter().map(|&(id, s)| mention(id, s)).collect()
    }

    pub(crate) fn messages(entries: &[(ItemId, i64)]) -> Vec<InboxItem> {
        entries.iter().map(|&(id, s)| message(id, s)).collect()
    }
}

/// Serves a scripted sequence of remote pages; anything past the script is
/// an empty page. Can be told to fail the next N calls with a network error
/// or to deny access outright.
pub(crate) struct ScriptedFetch {
    pages: Mutex<Vec<Vec<InboxItem>>>,
    pub(crate) calls: AtomicU32,
    fail_next: AtomicU32,
    denied: AtomicBool,
}

impl ScriptedFetch {
    pub(crate) fn new(pages: Vec<Vec<InboxItem>>) -> Self {
        Self {
            pages: Mutex::new(pages),
            calls: AtomicU32::new(0),
            fail_next: AtomicU32::new(0),
            denied: AtomicBool::new(false),
        }
    }

    /// Chunks a flat item list into remote pages of `page_size`.
    pub(crate) fn paged(items: Vec<InboxItem>, page_size: usize) -> Self {
        Self::new(items.chunks(page_size).map(<[_]>::to_vec).collect())
    }

    pub(crate) fn set_pages(&self, pages: Vec<Vec<InboxItem>>) {
        *self.pages.lock().unwrap() = pages;
    }

    pub(crate) fn fail_next(&self, count: u32) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    pub(crate) fn deny(&self) {
        self.denied.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PageFetch for ScriptedFetch {
    async fn fetch_page(&self, page: u32, _limit: u32, _force: bool) -> Result<Vec<InboxItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.denied.load(Ordering::SeqCst) {
            return Err(EstuaryError::NotAuthorized);
        }
        if self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(EstuaryError::Network("scripted fetch failure".into()));
        }
        let pages = self.pages.lock().unwrap();
        Ok(pages.get(page as usize).cloned().unwrap_or_default())
    }
}

/// An in-memory remote: one authoritative item list per category, served in
/// pages and filtered by the unread flag the way a real server would, with
/// switchable mutation failure and report authorization.
pub(crate) struct MockClient {
    store: Mutex<HashMap<Category, Vec<InboxItem>>>,
    fail_mutations: AtomicBool,
    deny_reports: AtomicBool,
    pub(crate) mutations: Mutex<Vec<(Category, ItemId, bool)>>,
}

impl MockClient {
    pub(crate) fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            fail_mutations: AtomicBool::new(false),
            deny_reports: AtomicBool::new(false),
            mutations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_items(&self, category: Category, items: Vec<InboxItem>) {
        self.store.lock().unwrap().insert(category, items);
    }

    pub(crate) fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn deny_reports(&self) {
        self.deny_reports.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_read(&self, category: Category, id: ItemId) -> bool {
        self.store
            .lock()
            .unwrap()
            .get(&category)
            .and_then(|items| items.iter().find(|item| item.id() == id))
            .map(InboxItem::is_read)
            .unwrap_or(false)
    }

    fn list(&self, category: Category, query: &PageQuery) -> Result<Vec<InboxItem>> {
        if category.is_report() && self.deny_reports.load(Ordering::SeqCst) {
            return Err(EstuaryError::NotAuthorized);
        }
        let store = self.store.lock().unwrap();
        let items = store.get(&category).cloned().unwrap_or_default();
        Ok(items
            .into_iter()
            .filter(|item| !query.unread_only || !item.is_read())
            .skip((query.page * query.limit) as usize)
            .take(query.limit as usize)
            .collect())
    }

    fn mutate(&self, category: Category, id: ItemId, read: bool) -> Result<()> {
        self.mutations.lock().unwrap().push((category, id, read));
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(EstuaryError::Network("scripted mutation failure".into()));
        }
        let mut store = self.store.lock().unwrap();
        if let Some(item) = store
            .get_mut(&category)
            .and_then(|items| items.iter_mut().find(|item| item.id() == id))
        {
            item.set_read(read);
        }
        Ok(())
    }
}

#[async_trait]
impl InboxClient for MockClient {
    async fn list_replies(&self, query: &PageQuery) -> Result<Vec<InboxItem>> {
        self.list(Category::Reply, query)
    }

    async fn list_mentions(&self, query: &PageQuery) -> Result<Vec<InboxItem>> {
        self.list(Category::Mention, query)
    }

    async fn list_messages(&self, query: &PageQuery) -> Result<Vec<InboxItem>> {
        self.list(Category::Message, query)
    }

    async fn list_post_reports(&self, query: &PageQuery) -> Result<Vec<InboxItem>> {
        self.list(Category::PostReport, query)
    }

    async fn list_comment_reports(&self, query: &PageQuery) -> Result<Vec<InboxItem>> {
        self.list(Category::CommentReport, query)
    }

    async fn mark_reply_read(&self, id: ItemId, read: bool) -> Result<()> {
        self.mutate(Category::Reply, id, read)
    }

    async fn mark_mention_read(&self, id: ItemId, read: bool) -> Result<()> {
        self.mutate(Category::Mention, id, read)
    }

    async fn mark_message_read(&self, id: ItemId, read: bool) -> Result<()> {
        self.mutate(Category::Message, id, read)
    }

    async fn resolve_post_report(&self, id: ItemId, resolved: bool) -> Result<()> {
        self.mutate(Category::PostReport, id, resolved)
    }

    async fn resolve_comment_report(&self, id: ItemId, resolved: bool) -> Result<()> {
        self.mutate(Category::CommentReport, id, resolved)
    }
}
