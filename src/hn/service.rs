//! Best-stories aggregation pipeline.
//!
//! Orchestrates the cached ranked-id fetch, a bounded-parallel fan-out
//! of per-item fetches, normalization, and the final two-key sort.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::cache::TtlCache;
use super::client::Transport;
use super::types::{
    Item, Story, BEST_IDS_CACHE_KEY, BEST_IDS_TTL, ITEM_TTL, MAX_CONCURRENT_ITEM_FETCHES,
};
use crate::TARGET_WEB_REQUEST;

/// Terminal outcomes of the aggregation pipeline. Per-candidate
/// failures degrade to skips and never surface here, so an empty
/// result stays distinguishable from a cancelled one.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request cancelled")]
    Cancelled,
}

/// Aggregates Hacker News best stories, with both fetch paths cached
/// process-wide. One instance is shared across all in-flight requests.
pub struct HnService {
    transport: Arc<dyn Transport>,
    best_ids: TtlCache<&'static str, Arc<Vec<u64>>>,
    items: TtlCache<u64, Item>,
}

impl HnService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        HnService {
            transport,
            best_ids: TtlCache::new(),
            items: TtlCache::new(),
        }
    }

    /// Returns up to `n` best stories sorted by score, ties broken by
    /// comment count, both descending. Candidates whose fetch fails or
    /// that do not qualify are dropped without failing the call; `n`
    /// of zero selects nothing.
    pub async fn get_best_stories(
        &self,
        n: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Story>, ServiceError> {
        // Biased so an already-raised cancellation wins over a ready
        // cache hit.
        let ids = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ServiceError::Cancelled),
            ids = self.best_story_ids() => ids,
        };

        let candidates: Vec<u64> = ids.iter().take(n).copied().collect();
        debug!(
            target: TARGET_WEB_REQUEST,
            "Resolving {} of {} ranked story ids",
            candidates.len(),
            ids.len()
        );

        let collect = stream::iter(candidates)
            .map(|id| self.resolve(id))
            .buffer_unordered(MAX_CONCURRENT_ITEM_FETCHES)
            .filter_map(|story| async move { story })
            .collect::<Vec<Story>>();

        // Dropping the unfinished stream on cancellation abandons all
        // in-flight item fetches.
        let mut stories = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ServiceError::Cancelled),
            stories = collect => stories,
        };

        stories.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.comment_count.cmp(&a.comment_count))
        });

        Ok(stories)
    }

    async fn resolve(&self, id: u64) -> Option<Story> {
        let item = self.item(id).await?;
        Story::from_item(item)
    }

    /// Current ranked best-story ids, served from cache within the TTL.
    /// A transport failure or malformed payload degrades to an empty
    /// list rather than failing the request; failures are not cached.
    pub async fn best_story_ids(&self) -> Arc<Vec<u64>> {
        if let Some(ids) = self.best_ids.get(&BEST_IDS_CACHE_KEY) {
            debug!(target: TARGET_WEB_REQUEST, "Best-story ids served from cache");
            return ids;
        }

        match self.transport.fetch_json("beststories.json").await {
            Ok(body) => match serde_json::from_slice::<Vec<u64>>(&body) {
                Ok(ids) => {
                    let ids = Arc::new(ids);
                    self.best_ids
                        .insert(BEST_IDS_CACHE_KEY, Arc::clone(&ids), BEST_IDS_TTL);
                    ids
                }
                Err(err) => {
                    warn!(target: TARGET_WEB_REQUEST, "Malformed best-story id payload: {}", err);
                    Arc::new(Vec::new())
                }
            },
            Err(err) => {
                warn!(target: TARGET_WEB_REQUEST, "Failed to fetch best-story ids: {}", err);
                Arc::new(Vec::new())
            }
        }
    }

    /// A single item by id, served from cache within the TTL. Fetch or
    /// decode failures yield `None` so one bad item never aborts a
    /// batch; absent items are not cached.
    pub async fn item(&self, id: u64) -> Option<Item> {
        if let Some(item) = self.items.get(&id) {
            return Some(item);
        }

        let path = format!("item/{}.json", id);
        let body = match self.transport.fetch_json(&path).await {
            Ok(body) => body,
            Err(err) => {
                warn!(target: TARGET_WEB_REQUEST, "Failed to fetch item {}: {}", id, err);
                return None;
            }
        };

        // The API answers 200 with a literal `null` body for unknown ids.
        match serde_json::from_slice::<Option<Item>>(&body) {
            Ok(Some(item)) => {
                self.items.insert(id, item.clone(), ITEM_TTL);
                Some(item)
            }
            Ok(None) => {
                debug!(target: TARGET_WEB_REQUEST, "Item {} does not exist upstream", id);
                None
            }
            Err(err) => {
                warn!(target: TARGET_WEB_REQUEST, "Undecodable payload for item {}: {}", id, err);
                None
            }
        }
    }
}
