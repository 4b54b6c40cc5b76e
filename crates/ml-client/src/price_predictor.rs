use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::MLResult;
use crate::{build_http_client, decode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    #[serde(default)]
    pub predicted_price: Option<f64>,
}

#[derive(Clone)]
pub struct PricePredictorClient {
    client: reqwest::Client,
    base_url: String,
}

impl PricePredictorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(build_http_client(timeout), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Predicted next price for a ticker
    pub async fn predict(&self, ticker: &str) -> MLResult<PricePrediction> {
        let response = self
            .client
            .get(format!("{}/predict", self.base_url))
            .query(&[("stock", ticker)])
            .send()
            .await?;

        decode(response).await
    }

    /// Check service health via the backend's welcome route
    pub async fn health(&self) -> MLResult<bool> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
