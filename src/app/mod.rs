// Application layer: wires the adapters into the lookup service and exposes it over HTTP.

pub mod response;
pub mod server;

use crate::adapters::{InMemoryCacheStore, ReqwestPageClient};
use crate::config::AppConfig;
use crate::core::{scraper::ReviewScraper, service::ReviewService};
use crate::utils::error::Result;

pub type DefaultReviewService =
    ReviewService<ReviewScraper<ReqwestPageClient, AppConfig>, InMemoryCacheStore, AppConfig>;

/// Builds the production lookup stack: reqwest transport, in-memory TTL cache.
///
/// Starts the cache purge task, so it must run inside a Tokio runtime. The task
/// ends once the returned service is dropped.
pub fn build_review_service(config: &AppConfig) -> Result<DefaultReviewService> {
    let client = ReqwestPageClient::new(&config.source.user_agent)?;
    let scraper = ReviewScraper::new(client, config.clone());

    let store = InMemoryCacheStore::new();
    store.spawn_purge_task(config.cache.purge_interval());

    Ok(ReviewService::new(scraper, store, config.clone()))
}
