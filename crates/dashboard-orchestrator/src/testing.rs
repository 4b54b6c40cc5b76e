//! Scripted prediction backend shared by the orchestrator tests.

use async_trait::async_trait;
use dashboard_core::DashboardSection;
use ml_client::financials::FinancialsResponse;
use ml_client::price_predictor::PricePrediction;
use ml_client::sentiment::{HeadlineSentiment, NewsSentimentResponse};
use ml_client::social_sentiment::{PostSentiment, RedditSentimentResponse};
use ml_client::{MLError, MLResult, PredictionBackend};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Barrier, Notify};

pub struct ScriptedBackend {
    failing: HashSet<DashboardSection>,
    barrier: Option<Arc<Barrier>>,
    gates: HashMap<String, Arc<Notify>>,
    sparse: bool,
    confidence: f64,
    calls: Arc<AtomicUsize>,
}

impl ScriptedBackend {
    pub const PRICE: f64 = 190.5;

    pub fn new() -> Self {
        Self {
            failing: HashSet::new(),
            barrier: None,
            gates: HashMap::new(),
            sparse: false,
            confidence: 0.8,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(mut self, section: DashboardSection) -> Self {
        self.failing.insert(section);
        self
    }

    /// Make each of the four calls wait until all four are in flight.
    pub fn rendezvous(mut self) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(4)));
        self
    }

    /// Hold every call for `ticker` until the returned notifier fires.
    pub fn gate(&mut self, ticker: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.insert(ticker.to_string(), notify.clone());
        notify
    }

    /// Respond with empty payloads.
    pub fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    async fn enter(&self, ticker: &str, section: DashboardSection) -> MLResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(gate) = self.gates.get(ticker) {
            gate.notified().await;
        }
        if self.failing.contains(&section) {
            return Err(MLError::ServiceUnavailable("Status: 500".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PredictionBackend for ScriptedBackend {
    async fn predict_price(&self, ticker: &str) -> MLResult<PricePrediction> {
        self.enter(ticker, DashboardSection::Price).await?;
        Ok(PricePrediction {
            predicted_price: (!self.sparse).then_some(Self::PRICE),
        })
    }

    async fn news_sentiment(&self, ticker: &str) -> MLResult<NewsSentimentResponse> {
        self.enter(ticker, DashboardSection::News).await?;
        if self.sparse {
            return Ok(NewsSentimentResponse::default());
        }
        Ok(NewsSentimentResponse {
            news: vec![HeadlineSentiment {
                headline: format!("{} beats estimates", ticker),
                sentiment: "positive".to_string(),
            }],
        })
    }

    async fn reddit_sentiment(&self, ticker: &str) -> MLResult<RedditSentimentResponse> {
        self.enter(ticker, DashboardSection::Reddit).await?;
        if self.sparse {
            return Ok(RedditSentimentResponse::default());
        }
        Ok(RedditSentimentResponse {
            reddit: vec![PostSentiment {
                post: format!("Holding {} through earnings", ticker),
                sentiment: "neutral".to_string(),
            }],
        })
    }

    async fn financials(&self, ticker: &str) -> MLResult<FinancialsResponse> {
        self.enter(ticker, DashboardSection::Financials).await?;
        if self.sparse {
            return Ok(FinancialsResponse::default());
        }
        Ok(FinancialsResponse {
            financials: Some(json!({ "TotalRevenue": 1000.0 })),
            direction: Some("UP".to_string()),
            confidence: Some(self.confidence),
        })
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}
