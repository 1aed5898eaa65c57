use std::collections::HashSet;
use std::sync::Arc;

use crate::app::Result;
use crate::client::{retry, PageFetch};
use crate::domain::{InboxItem, ItemId, Page, PAGE_SIZE};

/// One locally cached item together with the remote page that produced it.
/// The origin page is the unit of invalidation: remote page boundaries can
/// shift between fetches, so a forced refresh discards whole remote pages,
/// never single items.
#[derive(Debug, Clone)]
pub struct CachedItem {
    pub item: InboxItem,
    pub origin_page: u32,
}

/// A gapless, deduplicated, cursor-paginated view over one remote
/// collection. The cache is append-only in fetch order; the seen-set always
/// holds exactly the ids of the cached items.
pub struct ItemSource {
    fetch: Arc<dyn PageFetch>,
    page_size: u32,
    cached: Vec<CachedItem>,
    seen: HashSet<ItemId>,
    next_remote_page: u32,
    end_reached: bool,
}

impl ItemSource {
    pub fn new(fetch: Arc<dyn PageFetch>) -> Self {
        Self::with_page_size(fetch, PAGE_SIZE)
    }

    pub fn with_page_size(fetch: Arc<dyn PageFetch>, page_size: u32) -> Self {
        Self {
            fetch,
            page_size,
            cached: Vec::new(),
            seen: HashSet::new(),
            next_remote_page: 0,
            end_reached: false,
        }
    }

    /// Returns the 0-based local page `page_index`, fetching as many remote
    /// pages as needed to fill it. With `force`, every cached remote page
    /// overlapping the requested window is discarded and re-fetched.
    ///
    /// Both the fetched pages and the forced invalidation are staged and
    /// committed only once the fill loop completes, so a failed or cancelled
    /// call leaves the cache exactly as it was.
    pub async fn get_page(&mut self, page_index: u32, force: bool) -> Result<Page> {
        let cutoff = if force {
            self.invalidation_cutoff(page_index)
        } else {
            None
        };
        let kept = match cutoff {
            Some(min_origin) => self
                .cached
                .iter()
                .take_while(|c| c.origin_page < min_origin)
                .count(),
            None => self.cached.len(),
        };
        // Dedup against what survives the pending invalidation, not the full
        // seen-set: an item about to be discarded must not suppress its
        // re-fetched version.
        let kept_ids: HashSet<ItemId> = self.cached[..kept].iter().map(|c| c.item.id()).collect();

        let wanted = ((page_index + 1) * self.page_size) as usize;
        let mut staged: Vec<CachedItem> = Vec::new();
        let mut staged_ids: HashSet<ItemId> = HashSet::new();
        let mut cursor = cutoff.unwrap_or(self.next_remote_page);
        let mut end_reached = if force { false } else { self.end_reached };

        while kept + staged.len() < wanted && !end_reached {
            let fetched =
                retry::fetch_page_with_retry(self.fetch.as_ref(), cursor, self.page_size, force)
                    .await?;
            if fetched.len() < self.page_size as usize {
                end_reached = true;
            }
            for item in fetched {
                let id = item.id();
                if kept_ids.contains(&id) || !staged_ids.insert(id) {
                    tracing::debug!("Dropping duplicate item {} from remote page {}", id, cursor);
                    continue;
                }
                staged.push(CachedItem {
                    item,
                    origin_page: cursor,
                });
            }
            cursor += 1;
        }

        if let Some(min_origin) = cutoff {
            self.discard_from(min_origin);
        }
        self.seen.extend(staged_ids);
        self.cached.extend(staged);
        self.next_remote_page = cursor;
        self.end_reached = end_reached;

        Ok(self.window(page_index))
    }

    /// The item at flat index `index`, fetching its owning page first. None
    /// once the index is beyond all available data after a full fetch
    /// attempt.
    pub async fn get_item(&mut self, index: usize, force: bool) -> Result<Option<InboxItem>> {
        let page_index = index as u32 / self.page_size;
        self.get_page(page_index, force).await?;
        Ok(self.cached.get(index).map(|cached| cached.item.clone()))
    }

    /// Local-only read-state update; remote synchronization is the
    /// repository's job. Returns the updated item, or None if it is not
    /// cached here.
    pub fn mark_as_read(&mut self, id: ItemId, read: bool) -> Option<InboxItem> {
        let cached = self.cached.iter_mut().find(|c| c.item.id() == id)?;
        cached.item.set_read(read);
        Some(cached.item.clone())
    }

    /// Removes the item from the cache and the seen-set, so an unread-only
    /// source drops a just-read item without waiting for a re-fetch.
    pub fn remove_by_id(&mut self, id: ItemId) -> Option<CachedItem> {
        let position = self.cached.iter().position(|c| c.item.id() == id)?;
        let cached = self.cached.remove(position);
        self.seen.remove(&id);
        Some(cached)
    }

    /// Full invalidation: clears cache, seen-set, cursor, and end flag.
    pub fn reset(&mut self) {
        self.cached.clear();
        self.seen.clear();
        self.next_remote_page = 0;
        self.end_reached = false;
    }

    pub fn cached_len(&self) -> usize {
        self.cached.len()
    }

    /// Where a forced refresh of `page_index` rewinds the remote cursor to:
    /// the earliest origin page overlapping the requested window, if any
    /// cached item falls inside it. Remote page boundaries can shift between
    /// fetches, so invalidation works in whole remote pages, never single
    /// items.
    fn invalidation_cutoff(&self, page_index: u32) -> Option<u32> {
        let start = (page_index * self.page_size) as usize;
        if start >= self.cached.len() {
            return None;
        }
        let upper = (((page_index + 1) * self.page_size) as usize).min(self.cached.len());
        self.cached[start..upper]
            .iter()
            .map(|c| c.origin_page)
            .min()
    }

    /// Drops every cached item whose origin page is at or past `min_origin`
    /// and prunes the seen-set to match.
    fn discard_from(&mut self, min_origin: u32) {
        let before = self.cached.len();
        let seen = &mut self.seen;
        self.cached.retain(|c| {
            if c.origin_page >= min_origin {
                seen.remove(&c.item.id());
                false
            } else {
                true
            }
        });
        tracing::debug!(
            "Discarded {} cached items from remote page {} onward",
            before - self.cached.len(),
            min_origin
        );
    }

    fn window(&self, page_index: u32) -> Page {
        let start = ((page_index * self.page_size) as usize).min(self.cached.len());
        let end = ((page_index + 1) * self.page_size) as usize;
        let upper = end.min(self.cached.len());
        let items = self.cached[start..upper]
            .iter()
            .map(|c| c.item.clone())
            .collect();
        Page {
            items,
            has_more: !(self.end_reached && end >= self.cached.len()),
        }
    }
}
