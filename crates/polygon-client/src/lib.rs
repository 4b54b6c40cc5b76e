//! Polygon.io reference-data client used for ticker lookup.
//!
//! Runs server-side only: the API key never leaves the process.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://api.polygon.io";

/// Polygon caps a single reference page at 1000 results
const MAX_PAGE_SIZE: usize = 1000;

/// Longest a search waits for a rate-limit slot before failing
const DEFAULT_MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum PolygonError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Rate limit exhausted; no request slot within {0:?}")]
    RateLimited(Duration),
}

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    /// Wait for a request slot, giving up once the wait would exceed `max_wait`.
    /// Returns `false` without consuming a slot when it gives up.
    async fn acquire_within(&self, max_wait: Duration) -> bool {
        let deadline = Instant::now() + max_wait;
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            while ts
                .front()
                .is_some_and(|front| now.duration_since(*front) >= self.window)
            {
                ts.pop_front();
            }

            let oldest = match ts.front() {
                Some(oldest) if ts.len() >= self.max_requests => *oldest,
                _ => {
                    ts.push_back(now);
                    return true;
                }
            };

            // Wait until the oldest request falls out of the window
            let sleep_dur = (oldest + self.window).saturating_duration_since(now)
                + Duration::from_millis(50);
            if now + sleep_dur > deadline {
                return false;
            }
            drop(ts);
            tracing::debug!(
                "Rate limiter: waiting {:.1}s for Polygon API slot",
                sleep_dur.as_secs_f64()
            );
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// One hit from the reference tickers search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerSearchResult {
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub primary_exchange: Option<String>,
    #[serde(rename = "type", default)]
    pub ticker_type: Option<String>,
    #[serde(default)]
    pub currency_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TickerSearchResponse {
    #[serde(default)]
    results: Vec<TickerSearchResult>,
}

#[derive(Clone)]
pub struct PolygonClient {
    api_key: String,
    base_url: String,
    client: Client,
    rate_limiter: RateLimiter,
    max_rate_limit_wait: Duration,
}

impl PolygonClient {
    pub fn new(api_key: String) -> Self {
        // Free tier allows 5 requests/minute; paid plans should raise POLYGON_RATE_LIMIT.
        let rate_limit: usize = std::env::var("POLYGON_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
            max_rate_limit_wait: DEFAULT_MAX_RATE_LIMIT_WAIT,
        }
    }

    /// Build from `POLYGON_API_KEY`; `None` when the key is missing or blank.
    pub fn from_env() -> Option<Self> {
        std::env::var("POLYGON_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(key.trim().to_string()))
    }

    /// Point at a different host (tests, self-hosted mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_rate_limit(mut self, max_requests_per_minute: usize) -> Self {
        self.rate_limiter = RateLimiter::new(max_requests_per_minute, Duration::from_secs(60));
        self
    }

    /// How long a search may queue behind the rate limiter.
    pub fn with_max_rate_limit_wait(mut self, max_wait: Duration) -> Self {
        self.max_rate_limit_wait = max_wait;
        self
    }

    /// Search active stock tickers by code or company name.
    ///
    /// An empty query lists tickers alphabetically. Fails with
    /// [`PolygonError::RateLimited`] rather than queueing past the configured wait.
    pub async fn search_tickers(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<TickerSearchResult>, PolygonError> {
        let url = format!("{}/v3/reference/tickers", self.base_url);
        let limit = limit.clamp(1, MAX_PAGE_SIZE).to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("active", "true"),
            ("market", "stocks"),
            ("limit", &limit),
            ("apiKey", &self.api_key),
        ];
        let query = query.trim();
        if !query.is_empty() {
            params.push(("search", query));
        }

        if !self
            .rate_limiter
            .acquire_within(self.max_rate_limit_wait)
            .await
        {
            return Err(PolygonError::RateLimited(self.max_rate_limit_wait));
        }
        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(PolygonError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: TickerSearchResponse =
            serde_json::from_slice(&bytes).map_err(|e| PolygonError::Malformed(e.to_string()))?;

        Ok(parsed
            .results
            .into_iter()
            .filter(|r| !r.ticker.trim().is_empty())
            .collect())
    }
}
