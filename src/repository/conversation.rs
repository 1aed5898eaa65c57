use std::sync::Arc;

use tokio::sync::Mutex;

use crate::app::Result;
use crate::client::PageFetch;
use crate::domain::{Category, Page, CONVERSATION_PAGE_SIZE};
use crate::merge::MergeStream;
use crate::source::ItemSource;

/// A one-person message thread. Built on demand around a caller-supplied
/// page fetch, lives outside the fixed channel registry, and is simply
/// dropped when the conversation closes. Same paging protocol as the named
/// channels, larger pages.
pub struct Conversation {
    stream: Mutex<MergeStream>,
}

impl Conversation {
    pub fn new(fetch: Arc<dyn PageFetch>) -> Self {
        Self::with_page_size(fetch, CONVERSATION_PAGE_SIZE)
    }

    pub fn with_page_size(fetch: Arc<dyn PageFetch>, page_size: u32) -> Self {
        let source = ItemSource::with_page_size(fetch, page_size);
        let stream = MergeStream::with_page_size(vec![(Category::Message, source)], page_size);
        Self {
            stream: Mutex::new(stream),
        }
    }

    pub async fn get_page(
        &self,
        page_index: u32,
        force: bool,
        retain_items_on_force: bool,
    ) -> Result<Page> {
        let mut stream = self.stream.lock().await;
        stream.get_page(page_index, force, retain_items_on_force).await
    }

    pub async fn invalidate(&self) {
        self.stream.lock().await.invalidate();
    }
}
