//! Type definitions for the Hacker News module.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// Raw item as returned by the `item/{id}.json` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub id: u64,
    pub by: Option<String>,
    pub descendants: Option<i64>,
    pub kids: Option<Vec<u64>>,
    pub score: Option<i64>,
    pub text: Option<String>,
    #[serde(default)]
    pub time: i64,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
}

/// Normalized story summary returned to API callers. Created once by
/// [`Story::from_item`] and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub uri: String,
    #[serde(rename = "postedBy")]
    pub posted_by: String,
    pub time: String,
    pub score: i64,
    #[serde(rename = "commentCount")]
    pub comment_count: i64,
}

impl Story {
    /// Normalize a raw item into a story summary.
    ///
    /// An absent or empty title disqualifies the item; everything else
    /// falls back to a default. Score and comment count are passed
    /// through unclamped, matching upstream data.
    pub fn from_item(item: Item) -> Option<Story> {
        let title = item.title.filter(|t| !t.is_empty())?;
        let time = DateTime::from_timestamp(item.time, 0)?
            .format("%Y-%m-%dT%H:%M:%S+00:00")
            .to_string();

        Some(Story {
            title,
            uri: item.url.unwrap_or_default(),
            posted_by: item.by.unwrap_or_else(|| "unknown".to_string()),
            time,
            score: item.score.unwrap_or(0),
            comment_count: item.descendants.unwrap_or(0),
        })
    }
}

// Constants
pub const BEST_IDS_CACHE_KEY: &str = "hn_best_ids";
pub const BEST_IDS_TTL: Duration = Duration::from_secs(30);
pub const ITEM_TTL: Duration = Duration::from_secs(60);
pub const MAX_CONCURRENT_ITEM_FETCHES: usize = 8;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_STORY_COUNT: usize = 10;
pub const MAX_STORY_COUNT: usize = 500;
