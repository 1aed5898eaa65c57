use std::sync::Arc;

use async_trait::async_trait;

use crate::app::{EstuaryError, Result};
use crate::client::{InboxClient, PageFetch, PageQuery, SortOrder};
use crate::domain::{Category, InboxItem};

/// Adapts one (category, unread-only) pair of the remote client into the
/// page-fetch interface consumed by an `ItemSource`. The unread restriction
/// is a remote fetch parameter, which is why an unread source is a separate
/// instance with its own cache rather than a client-side filter.
pub struct CategoryFetch {
    client: Arc<dyn InboxClient>,
    category: Category,
    unread_only: bool,
}

impl CategoryFetch {
    pub fn new(client: Arc<dyn InboxClient>, category: Category, unread_only: bool) -> Self {
        Self {
            client,
            category,
            unread_only,
        }
    }
}

#[async_trait]
impl PageFetch for CategoryFetch {
    async fn fetch_page(&self, page: u32, limit: u32, force: bool) -> Result<Vec<InboxItem>> {
        let query = PageQuery {
            page,
            limit,
            unread_only: self.unread_only,
            sort: SortOrder::New,
            force,
        };

        let result = match self.category {
            Category::Reply => self.client.list_replies(&query).await,
            Category::Mention => self.client.list_mentions(&query).await,
            Category::Message => self.client.list_messages(&query).await,
            Category::PostReport => self.client.list_post_reports(&query).await,
            Category::CommentReport => self.client.list_comment_reports(&query).await,
        };

        match result {
            // A non-moderator sees an empty report queue, not an error.
            Err(EstuaryError::NotAuthorized) if self.category.is_report() => {
                tracing::debug!("Not authorized for {} listing, serving empty page", self.category);
                Ok(Vec::new())
            }
            other => other,
        }
    }
}
