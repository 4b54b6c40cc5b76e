use async_trait::async_trait;

use crate::error::MLResult;
use crate::financials::FinancialsResponse;
use crate::price_predictor::PricePrediction;
use crate::sentiment::NewsSentimentResponse;
use crate::social_sentiment::RedditSentimentResponse;
use crate::MLClient;

/// Backend-agnostic interface to the prediction service.
///
/// The dashboard aggregator only talks to this trait, so tests can swap in
/// scripted backends.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn predict_price(&self, ticker: &str) -> MLResult<PricePrediction>;

    async fn news_sentiment(&self, ticker: &str) -> MLResult<NewsSentimentResponse>;

    async fn reddit_sentiment(&self, ticker: &str) -> MLResult<RedditSentimentResponse>;

    async fn financials(&self, ticker: &str) -> MLResult<FinancialsResponse>;

    async fn health(&self) -> MLResult<bool> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str;
}

/// HTTP-backed implementation that delegates to `MLClient`.
pub struct HttpPredictionBackend {
    client: MLClient,
}

impl HttpPredictionBackend {
    pub fn new(client: MLClient) -> Self {
        Self { client }
    }
}

impl From<MLClient> for HttpPredictionBackend {
    fn from(client: MLClient) -> Self {
        Self::new(client)
    }
}

#[async_trait]
impl PredictionBackend for HttpPredictionBackend {
    async fn predict_price(&self, ticker: &str) -> MLResult<PricePrediction> {
        self.client.price_predictor.predict(ticker).await
    }

    async fn news_sentiment(&self, ticker: &str) -> MLResult<NewsSentimentResponse> {
        self.client.news.analyze(ticker).await
    }

    async fn reddit_sentiment(&self, ticker: &str) -> MLResult<RedditSentimentResponse> {
        self.client.reddit.analyze(ticker).await
    }

    async fn financials(&self, ticker: &str) -> MLResult<FinancialsResponse> {
        self.client.financials.analyze(ticker).await
    }

    async fn health(&self) -> MLResult<bool> {
        self.client.price_predictor.health().await
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use crate::MLConfig;
    use axum::{
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    #[tokio::test]
    async fn test_http_backend_hits_every_endpoint() {
        let router = Router::new()
            .route("/", get(|| async { Json(json!({ "message": "ok" })) }))
            .route(
                "/predict",
                get(|| async { Json(json!({ "predicted_price": 412.5 })) }),
            )
            .route(
                "/api/news",
                post(|| async {
                    Json(json!({ "news": [{ "headline": "h", "sentiment": "neutral" }] }))
                }),
            )
            .route(
                "/api/reddit",
                post(|| async { Json(json!({ "reddit": [] })) }),
            )
            .route(
                "/api/financials",
                post(|| async { Json(json!({ "direction": "UP", "confidence": 0.6 })) }),
            );
        let base = serve(router).await;
        let backend = HttpPredictionBackend::from(MLClient::new(MLConfig::new(base)));

        assert_eq!(backend.backend_name(), "http");
        assert!(backend.health().await.unwrap());
        assert_eq!(
            backend.predict_price("MSFT").await.unwrap().predicted_price,
            Some(412.5)
        );
        assert_eq!(backend.news_sentiment("MSFT").await.unwrap().news.len(), 1);
        assert!(backend.reddit_sentiment("MSFT").await.unwrap().reddit.is_empty());
        assert_eq!(
            backend.financials("MSFT").await.unwrap().direction.as_deref(),
            Some("UP")
        );
    }
}
