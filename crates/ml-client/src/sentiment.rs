use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::MLResult;
use crate::{build_http_client, decode, TickerRequest};

/// A headline and the label the news classifier gave it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSentiment {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub sentiment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSentimentResponse {
    #[serde(default)]
    pub news: Vec<HeadlineSentiment>,
}

#[derive(Clone)]
pub struct NewsSentimentClient {
    client: reqwest::Client,
    base_url: String,
}

impl NewsSentimentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(build_http_client(timeout), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Classify recent headlines about a ticker
    pub async fn analyze(&self, ticker: &str) -> MLResult<NewsSentimentResponse> {
        let response = self
            .client
            .post(format!("{}/api/news", self.base_url))
            .json(&TickerRequest { ticker })
            .send()
            .await?;

        decode(response).await
    }
}
