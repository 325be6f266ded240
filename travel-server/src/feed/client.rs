//! HTTP client for the price-list feed.

use std::future::Future;

use super::error::FeedError;
use super::refresh::PriceListSource;
use crate::domain::PriceList;

/// Default feed URL.
pub const DEFAULT_FEED_URL: &str =
    "https://cosmos-odyssey.azurewebsites.net/api/v1.0/TravelPrices";

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Full URL of the price-list endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl FeedConfig {
    /// Set a custom URL (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Client for the price-list feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a new feed client.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the price list currently published by the feed.
    pub async fn fetch_price_list(&self) -> Result<PriceList, FeedError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_price_list(&body)
    }
}

impl PriceListSource for FeedClient {
    fn fetch(&self) -> impl Future<Output = Result<PriceList, FeedError>> + Send {
        self.fetch_price_list()
    }
}

/// Parse a feed response body.
pub fn parse_price_list(body: &str) -> Result<PriceList, FeedError> {
    serde_json::from_str(body).map_err(|e| FeedError::Json {
        message: e.to_string(),
    })
}
