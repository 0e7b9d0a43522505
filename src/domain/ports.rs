use crate::domain::model::ReviewSnapshot;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw outcome of a GET against the review source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// How a freshly fetched snapshot is written back to the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheWriteMode {
    /// The write completes before the lookup returns.
    #[default]
    Awaited,
    /// The write is spawned before the lookup returns and finishes in the
    /// background. A write in flight is lost if the process exits.
    Detached,
}

#[async_trait]
pub trait PageClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<PageResponse>;
}

/// Key-value store addressed by domain, values are serialized snapshots.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

/// Produces a snapshot straight from the review source. `Ok(None)` means
/// there is nothing to look up (blank domain), not a failure.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn fetch_review(&self, domain: &str) -> Result<Option<ReviewSnapshot>>;
}

/// Entry point the API layer talks to.
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    async fn get_review(&self, domain: &str) -> Result<Option<ReviewSnapshot>>;
}

pub trait ConfigProvider: Send + Sync {
    fn review_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn cache_ttl(&self) -> Duration;
    fn cache_write_mode(&self) -> CacheWriteMode;
}
