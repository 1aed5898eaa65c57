use std::collections::HashSet;

use futures::future::join_all;

use crate::app::{EstuaryError, Result};
use crate::domain::{Category, InboxItem, ItemId, Page, PAGE_SIZE};
use crate::source::{CachedItem, ItemSource};

/// One child of a merge stream: the source plus this stream's private merge
/// cursor over it. The cursor counts items already consumed by the merge
/// and only moves when this child wins a round.
struct MergeSource {
    category: Category,
    source: ItemSource,
    cursor: usize,
}

/// A single feed ordered descending by `last_update`, merged lazily across
/// several item sources. Items are pulled one merge round at a time: peek
/// every child's next unconsumed item, pick the newest, advance only the
/// winner. Work is therefore bounded by the requested window, at the cost
/// of at most one extra remote page per child per call.
///
/// Ties on `last_update` go to the earliest-registered child; duplicate
/// timestamps across categories are expected and the order between them
/// carries no meaning.
pub struct MergeStream {
    children: Vec<MergeSource>,
    page_size: u32,
    merged: Vec<InboxItem>,
    seen: HashSet<ItemId>,
}

impl MergeStream {
    pub fn new(sources: Vec<(Category, ItemSource)>) -> Self {
        Self::with_page_size(sources, PAGE_SIZE)
    }

    pub fn with_page_size(sources: Vec<(Category, ItemSource)>, page_size: u32) -> Self {
        let children = sources
            .into_iter()
            .map(|(category, source)| MergeSource {
                category,
                source,
                cursor: 0,
            })
            .collect();
        Self {
            children,
            page_size,
            merged: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Returns the 0-based page `page_index` of the merged feed.
    ///
    /// The merged list is append-only between forces, so already-returned
    /// pages never change identity or order. With `force`, every child
    /// re-fetches from its first remote page; unless `retain_items_on_force`
    /// is set, the merged prefix and seen-set are discarded too (a clean
    /// slate, at the price of the prefix-stability guarantee).
    pub async fn get_page(
        &mut self,
        page_index: u32,
        force: bool,
        retain_items_on_force: bool,
    ) -> Result<Page> {
        if force {
            if !retain_items_on_force {
                self.merged.clear();
                self.seen.clear();
                for child in &mut self.children {
                    child.cursor = 0;
                }
            }
            for child in &mut self.children {
                child.source.get_page(0, true).await?;
            }
        }

        let wanted = ((page_index + 1) * self.page_size) as usize;

        // Winners and cursor advances are staged and committed only if the
        // whole fill succeeds; a mid-merge failure or cancellation leaves
        // the stream exactly as it was.
        let mut staged: Vec<InboxItem> = Vec::new();
        let mut staged_ids: HashSet<ItemId> = HashSet::new();
        let mut cursors: Vec<usize> = self.children.iter().map(|c| c.cursor).collect();
        let mut exhausted = false;

        while self.merged.len() + staged.len() < wanted {
            // Peek every child at its cursor, concurrently. Peeking may pull
            // a fresh remote page into a child's cache but never advances a
            // cursor, so losing candidates are left untouched.
            let peeks = join_all(self.children.iter_mut().zip(cursors.iter()).map(
                |(child, &cursor)| async move {
                    (child.category, child.source.get_item(cursor, false).await)
                },
            ))
            .await;

            let mut winner: Option<(usize, InboxItem)> = None;
            for (index, (category, peeked)) in peeks.into_iter().enumerate() {
                let item = peeked.map_err(|err| EstuaryError::StaleMerge {
                    category,
                    source: Box::new(err),
                })?;
                let Some(item) = item else { continue };
                let newer = match &winner {
                    Some((_, current)) => item.last_update() > current.last_update(),
                    None => true,
                };
                if newer {
                    winner = Some((index, item));
                }
            }

            let Some((index, item)) = winner else {
                exhausted = true;
                break;
            };
            cursors[index] += 1;

            let id = item.id();
            if self.seen.contains(&id) || !staged_ids.insert(id) {
                // The same id surfaced from two categories; keep the first.
                tracing::debug!("Dropping cross-source duplicate item {}", id);
                continue;
            }
            staged.push(item);
        }

        for (child, cursor) in self.children.iter_mut().zip(cursors) {
            child.cursor = cursor;
        }
        self.seen.extend(staged_ids);
        self.merged.extend(staged);

        Ok(self.window(page_index, exhausted))
    }

    /// Broadcasts the local read-state update to every child; the first hit
    /// wins. The merged copy, if any, is kept in step so the current window
    /// reflects the change immediately.
    pub fn mark_as_read(&mut self, id: ItemId, read: bool) -> Option<InboxItem> {
        let mut updated = None;
        for child in &mut self.children {
            let result = child.source.mark_as_read(id, read);
            updated = updated.or(result);
        }
        if let Some(item) = self.merged.iter_mut().find(|item| item.id() == id) {
            item.set_read(read);
        }
        updated
    }

    /// Removes the item from every child and from the merged output, so a
    /// just-read item vanishes from an unread feed without waiting for the
    /// next forced refresh.
    pub fn remove_by_id(&mut self, id: ItemId) -> Option<CachedItem> {
        let mut removed = None;
        for child in &mut self.children {
            let result = child.source.remove_by_id(id);
            removed = removed.or(result);
        }
        self.merged.retain(|item| item.id() != id);
        self.seen.remove(&id);
        removed
    }

    /// Resets every child source and clears the merged state.
    pub fn invalidate(&mut self) {
        for child in &mut self.children {
            child.source.reset();
            child.cursor = 0;
        }
        self.merged.clear();
        self.seen.clear();
    }

    fn window(&self, page_index: u32, exhausted: bool) -> Page {
        let start = ((page_index * self.page_size) as usize).min(self.merged.len());
        let end = ((page_index + 1) * self.page_size) as usize;
        let upper = end.min(self.merged.len());
        Page {
            items: self.merged[start..upper].to_vec(),
            has_more: !(exhausted && end >= self.merged.len()),
        }
    }
}
