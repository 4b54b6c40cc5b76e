use crate::error::MLResult;
use crate::{build_http_client, decode, TickerRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSentiment {
    #[serde(default)]
    pub post: String,
    #[serde(default)]
    pub sentiment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditSentimentResponse {
    #[serde(default)]
    pub reddit: Vec<PostSentiment>,
}

#[derive(Clone)]
pub struct RedditSentimentClient {
    client: reqwest::Client,
    base_url: String,
}

impl RedditSentimentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(build_http_client(timeout), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn analyze(&self, ticker: &str) -> MLResult<RedditSentimentResponse> {
        let url = format!("{}/api/reddit", self.base_url);
        let response = self
            .client
            .post(url)
            .json(&TickerRequest { ticker })
            .send()
            .await?;

        decode(response).await
    }
}
