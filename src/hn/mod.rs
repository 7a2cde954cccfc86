//! Hacker News best-stories pipeline.
//!
//! This module handles fetching the ranked best-story ids, resolving
//! individual items with bounded parallelism, and normalizing them into
//! sorted story summaries. Both fetch paths sit behind in-process TTL
//! caches shared across concurrent requests.

mod cache;
mod client;
mod service;
mod types;

pub use self::types::*;

pub use self::cache::TtlCache;
pub use self::client::{HttpTransport, Transport, DEFAULT_BASE_URL};
pub use self::service::{HnService, ServiceError};
