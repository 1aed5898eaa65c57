pub mod conversation;

pub use conversation::Conversation;

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, Mutex};

use crate::app::{EstuaryError, Result};
use crate::client::{CategoryFetch, InboxClient, PageFetch};
use crate::domain::{Category, Channel, InboxItem, Page};
use crate::merge::MergeStream;
use crate::source::ItemSource;

const MUTATION_QUEUE_DEPTH: usize = 32;
const EVENT_QUEUE_DEPTH: usize = 16;

/// Notifications for collaborators that keep derived state (an unread
/// badge, say) outside the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryEvent {
    UnreadCountChanged,
}

enum Mutation {
    MarkAsRead {
        item: InboxItem,
        read: bool,
        done: oneshot::Sender<Result<()>>,
    },
    InvalidateAll {
        done: oneshot::Sender<()>,
    },
}

/// The channel façade over the inbox engine. Owns one merge stream per
/// named channel; each stream exclusively owns its child sources, and the
/// all/unread duals of every category are independent instances because the
/// unread restriction is a remote fetch parameter.
///
/// Page reads on different channels run concurrently; reads on the same
/// channel serialize on that channel's lock. All state-mutating calls are
/// funneled through a single worker task so they never interleave.
pub struct InboxRepository {
    all: Arc<Mutex<MergeStream>>,
    unread: Arc<Mutex<MergeStream>>,
    replies: Arc<Mutex<MergeStream>>,
    mentions: Arc<Mutex<MergeStream>>,
    messages: Arc<Mutex<MergeStream>>,
    reports: Arc<Mutex<MergeStream>>,
    mutations: mpsc::Sender<Mutation>,
    events: broadcast::Sender<RepositoryEvent>,
}

impl InboxRepository {
    /// Builds the fixed channel registry and spawns the mutation worker.
    /// Must be called from within a tokio runtime.
    pub fn new(client: Arc<dyn InboxClient>) -> Self {
        let all = channel_stream(&client, &Category::ALL, false);
        let unread = channel_stream(&client, &Category::ALL, true);
        let replies = channel_stream(&client, &[Category::Reply], false);
        let mentions = channel_stream(&client, &[Category::Mention], false);
        let messages = channel_stream(&client, &[Category::Message], false);
        let reports = channel_stream(
            &client,
            &[Category::PostReport, Category::CommentReport],
            false,
        );

        let (mutations, jobs) = mpsc::channel(MUTATION_QUEUE_DEPTH);
        let (events, _) = broadcast::channel(EVENT_QUEUE_DEPTH);

        let worker = MutationWorker {
            client,
            all: all.clone(),
            unread: unread.clone(),
            registry: vec![
                all.clone(),
                unread.clone(),
                replies.clone(),
                mentions.clone(),
                messages.clone(),
                reports.clone(),
            ],
            events: events.clone(),
        };
        tokio::spawn(worker.run(jobs));

        Self {
            all,
            unread,
            replies,
            mentions,
            messages,
            reports,
            mutations,
            events,
        }
    }

    /// Returns one page of the named channel's merged feed.
    pub async fn get_page(
        &self,
        page_index: u32,
        channel: Channel,
        force: bool,
        retain_items_on_force: bool,
    ) -> Result<Page> {
        let mut stream = self.stream(channel).lock().await;
        stream.get_page(page_index, force, retain_items_on_force).await
    }

    /// Read-state mutation with cross-channel consistency: optimistic local
    /// apply, authoritative remote call, commit or roll back. On success the
    /// unread feed is reconciled and an unread-count refresh is announced;
    /// on failure the local change is reverted and the original failure
    /// propagates. The remote call is attempted once; a failed read-state
    /// toggle is user-visible and safe to retry manually.
    pub async fn mark_as_read(&self, item: &InboxItem, read: bool) -> Result<()> {
        let (done, outcome) = oneshot::channel();
        self.mutations
            .send(Mutation::MarkAsRead {
                item: item.clone(),
                read,
                done,
            })
            .await
            .map_err(|_| EstuaryError::Closed)?;
        outcome.await.map_err(|_| EstuaryError::Closed)?
    }

    /// Drops every channel's cached state; used when the active account or
    /// instance changes. Conversations live outside the registry and are
    /// expected to be dropped by their owners.
    pub async fn on_server_changed(&self) -> Result<()> {
        let (done, outcome) = oneshot::channel();
        self.mutations
            .send(Mutation::InvalidateAll { done })
            .await
            .map_err(|_| EstuaryError::Closed)?;
        outcome.await.map_err(|_| EstuaryError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RepositoryEvent> {
        self.events.subscribe()
    }

    /// Opens a one-person message thread over a caller-supplied fetch.
    pub fn open_conversation(&self, fetch: Arc<dyn PageFetch>) -> Conversation {
        Conversation::new(fetch)
    }

    fn stream(&self, channel: Channel) -> &Arc<Mutex<MergeStream>> {
        match channel {
            Channel::All => &self.all,
            Channel::Unread => &self.unread,
            Channel::Replies => &self.replies,
            Channel::Mentions => &self.mentions,
            Channel::Messages => &self.messages,
            Channel::Reports => &self.reports,
        }
    }
}

fn channel_stream(
    client: &Arc<dyn InboxClient>,
    categories: &[Category],
    unread_only: bool,
) -> Arc<Mutex<MergeStream>> {
    let sources = categories
        .iter()
        .map(|&category| {
            let fetch: Arc<dyn PageFetch> =
                Arc::new(CategoryFetch::new(client.clone(), category, unread_only));
            (category, ItemSource::new(fetch))
        })
        .collect();
    Arc::new(Mutex::new(MergeStream::new(sources)))
}

/// The single-concurrency mutation worker. Runs until the repository (the
/// sender side) is dropped.
struct MutationWorker {
    client: Arc<dyn InboxClient>,
    all: Arc<Mutex<MergeStream>>,
    unread: Arc<Mutex<MergeStream>>,
    registry: Vec<Arc<Mutex<MergeStream>>>,
    events: broadcast::Sender<RepositoryEvent>,
}

impl MutationWorker {
    async fn run(self, mut jobs: mpsc::Receiver<Mutation>) {
        while let Some(job) = jobs.recv().await {
            match job {
                Mutation::MarkAsRead { item, read, done } => {
                    let outcome = self.mark_as_read(&item, read).await;
                    let _ = done.send(outcome);
                }
                Mutation::InvalidateAll { done } => {
                    for stream in &self.registry {
                        stream.lock().await.invalidate();
                    }
                    tracing::info!("Invalidated all channels");
                    let _ = done.send(());
                }
            }
        }
    }

    async fn mark_as_read(&self, item: &InboxItem, read: bool) -> Result<()> {
        let id = item.id();
        let category = item.category();

        // Optimistic local apply, then full reset: neither the merge order
        // nor the window boundaries are trusted after a point mutation.
        {
            let mut all = self.all.lock().await;
            all.mark_as_read(id, read);
            all.invalidate();
        }
        {
            let mut unread = self.unread.lock().await;
            if read {
                unread.remove_by_id(id);
            }
            unread.invalidate();
        }

        let remote = match category {
            Category::Reply => self.client.mark_reply_read(id, read).await,
            Category::Mention => self.client.mark_mention_read(id, read).await,
            Category::Message => self.client.mark_message_read(id, read).await,
            Category::PostReport => self.client.resolve_post_report(id, read).await,
            Category::CommentReport => self.client.resolve_comment_report(id, read).await,
        };

        match remote {
            Ok(()) => {
                tracing::debug!("Committed read={} for {} item {}", read, category, id);
                self.reconcile_unread().await;
                self.unread.lock().await.invalidate();
                let _ = self.events.send(RepositoryEvent::UnreadCountChanged);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    "Remote read-state update for {} item {} failed, rolling back: {}",
                    category,
                    id,
                    err
                );
                self.all.lock().await.mark_as_read(id, !read);
                if read {
                    self.reconcile_unread().await;
                }
                Err(err)
            }
        }
    }

    /// Best-effort forced refresh of the unread feed's first page, keeping
    /// the merged prefix so scroll positions elsewhere survive. A failure
    /// here is logged and dropped: the remote mutation already settled.
    async fn reconcile_unread(&self) {
        let mut unread = self.unread.lock().await;
        if let Err(err) = unread.get_page(0, true, true).await {
            tracing::warn!("Unread reconcile fetch failed: {}", err);
        }
    }
}
