use crate::domain::ports::{PageClient, PageResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_USER_AGENT: &str = concat!("review-scraper/", env!("CARGO_PKG_VERSION"));

/// `PageClient` over a shared reqwest connection pool.
///
/// Any status is returned as a `PageResponse`; only connection-level failures
/// become errors. Timeouts are enforced by the caller, not here.
#[derive(Debug, Clone)]
pub struct ReqwestPageClient {
    client: Client,
}

impl ReqwestPageClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageClient for ReqwestPageClient {
    async fn get(&self, url: &str) -> Result<PageResponse> {
        tracing::debug!("Making request to: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        tracing::debug!("Response status: {}", status);

        let body = response.text().await?;
        Ok(PageResponse { status, body })
    }
}
