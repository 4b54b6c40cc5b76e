pub mod error;
pub mod financials;
pub mod price_predictor;
pub mod provider;
pub mod sentiment;
pub mod social_sentiment;

pub use error::{MLError, MLResult};
pub use financials::FinancialsClient;
pub use price_predictor::PricePredictorClient;
pub use provider::{HttpPredictionBackend, PredictionBackend};
pub use sentiment::NewsSentimentClient;
pub use social_sentiment::RedditSentimentClient;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Configuration for the prediction backend
#[derive(Debug, Clone)]
pub struct MLConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for MLConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl MLConfig {
    /// Read `STOCK_API_URL` and `STOCK_API_TIMEOUT_SECS`, falling back to
    /// the local backend with a 10 second timeout.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("STOCK_API_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let timeout_secs = std::env::var("STOCK_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self::new(base_url).with_timeout(Duration::from_secs(timeout_secs))
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Complete client for every backend endpoint the dashboard reads
#[derive(Clone)]
pub struct MLClient {
    pub price_predictor: PricePredictorClient,
    pub news: NewsSentimentClient,
    pub reddit: RedditSentimentClient,
    pub financials: FinancialsClient,
}

impl MLClient {
    pub fn new(config: MLConfig) -> Self {
        let client = build_http_client(config.timeout);
        Self {
            price_predictor: PricePredictorClient::with_client(client.clone(), &config.base_url),
            news: NewsSentimentClient::with_client(client.clone(), &config.base_url),
            reddit: RedditSentimentClient::with_client(client.clone(), &config.base_url),
            financials: FinancialsClient::with_client(client, &config.base_url),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MLConfig::default())
    }
}

/// JSON body of the backend's POST endpoints
#[derive(Debug, Serialize)]
pub(crate) struct TickerRequest<'a> {
    pub ticker: &'a str,
}

pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Reject non-2xx statuses and decode the body, reporting shape mismatches
/// as [`MLError::InvalidResponse`].
pub(crate) async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> MLResult<T> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Backend returned {} for {}", status, response.url().path());
        return Err(MLError::ServiceUnavailable(format!("Status: {}", status)));
    }

    let path = response.url().path().to_string();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!("Malformed backend payload from {}: {}", path, e);
        MLError::InvalidResponse(e.to_string())
    })
}
