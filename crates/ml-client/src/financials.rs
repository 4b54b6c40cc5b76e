use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::MLResult;
use crate::{build_http_client, decode, TickerRequest};

/// Financial statement summary plus the direction model's call.
///
/// `financials` is passed through untouched; its shape belongs to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialsResponse {
    #[serde(default)]
    pub financials: Option<serde_json::Value>,
    /// "UP" or "DOWN"
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Clone)]
pub struct FinancialsClient {
    client: reqwest::Client,
    base_url: String,
}

impl FinancialsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(build_http_client(timeout), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch statements and the year-over-year direction prediction
    pub async fn analyze(&self, ticker: &str) -> MLResult<FinancialsResponse> {
        let response = self
            .client
            .post(format!("{}/api/financials", self.base_url))
            .json(&TickerRequest { ticker })
            .send()
            .await?;

        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::{routing::post, Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn test_analyze() {
        let router = Router::new().route(
            "/api/financials",
            post(|| async {
                Json(json!({
                    "financials": { "TotalRevenue": 391035000000.0, "NetIncome": 93736000000.0 },
                    "direction": "UP",
                    "confidence": 0.71
                }))
            }),
        );
        let client = FinancialsClient::new(serve(router).await, Duration::from_secs(5));

        let response = client.analyze("AAPL").await.unwrap();
        assert_eq!(response.direction.as_deref(), Some("UP"));
        assert_eq!(response.confidence, Some(0.71));
        assert_eq!(
            response.financials.unwrap()["NetIncome"],
            json!(93736000000.0)
        );
    }

    #[tokio::test]
    async fn test_partial_payload() {
        let router = Router::new().route(
            "/api/financials",
            post(|| async { Json(json!({ "direction": "DOWN" })) }),
        );
        let client = FinancialsClient::new(serve(router).await, Duration::from_secs(5));

        let response = client.analyze("AAPL").await.unwrap();
        assert_eq!(response.direction.as_deref(), Some("DOWN"));
        assert!(response.financials.is_none());
        assert!(response.confidence.is_none());
    }
}
