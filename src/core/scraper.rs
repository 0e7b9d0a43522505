use crate::core::extractor::extract;
use crate::domain::model::ReviewSnapshot;
use crate::domain::ports::{ConfigProvider, PageClient, ReviewSource};
use crate::utils::error::{Result, ReviewError};
use async_trait::async_trait;

/// Fetches a domain's review page and extracts its snapshot.
///
/// One attempt per call, bounded by `ConfigProvider::request_timeout`, which
/// covers the request and the full body. Retrying is up to the caller.
pub struct ReviewScraper<P: PageClient, C: ConfigProvider> {
    client: P,
    config: C,
}

impl<P: PageClient, C: ConfigProvider> ReviewScraper<P, C> {
    pub fn new(client: P, config: C) -> Self {
        Self { client, config }
    }

    fn review_url(&self, domain: &str) -> String {
        format!("{}{}", self.config.review_url(), domain)
    }
}

#[async_trait]
impl<P: PageClient, C: ConfigProvider> ReviewSource for ReviewScraper<P, C> {
    async fn fetch_review(&self, domain: &str) -> Result<Option<ReviewSnapshot>> {
        if domain.trim().is_empty() {
            tracing::debug!("Blank domain, nothing to scrape");
            return Ok(None);
        }

        let url = self.review_url(domain);
        let timeout = self.config.request_timeout();
        tracing::debug!("Start scraping review for domain: {}", domain);

        let response = tokio::time::timeout(timeout, self.client.get(&url))
            .await
            .map_err(|_| {
                tracing::debug!("Review request for {} exceeded {:?}", url, timeout);
                ReviewError::Timeout { timeout }
            })??;

        if response.status == 404 {
            tracing::debug!("Review source has no page for domain: {}", domain);
            return Err(ReviewError::not_found(domain));
        }

        if !response.is_success() {
            tracing::debug!(
                "Review source responded with status {} for {}: {}",
                response.status,
                url,
                response.body
            );
            return Err(ReviewError::RemoteError {
                status: response.status,
                body: response.body,
            });
        }

        extract(&response.body).map(Some)
    }
}
