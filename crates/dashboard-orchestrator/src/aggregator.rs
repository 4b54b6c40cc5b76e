use chrono::Utc;
use dashboard_core::{
    normalize_ticker, valid_confidence, DashboardError, DashboardResult, DashboardSection,
    NewsItem, RedditPost,
};
use ml_client::{MLError, PredictionBackend};
use std::sync::Arc;
use std::time::Instant;

/// Loads every dashboard section for a ticker as one all-or-nothing unit.
#[derive(Clone)]
pub struct DashboardAggregator {
    backend: Arc<dyn PredictionBackend>,
}

impl DashboardAggregator {
    pub fn new(backend: Arc<dyn PredictionBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn PredictionBackend> {
        &self.backend
    }

    /// Fetch price, news, Reddit and financials concurrently and merge them.
    ///
    /// All four requests are issued before any is awaited. If any of them
    /// fails the whole load fails with the first failing section in
    /// Price, News, Reddit, Financials order.
    pub async fn load(&self, ticker: &str) -> Result<DashboardResult, DashboardError> {
        let ticker = normalize_ticker(ticker)?;
        let started = Instant::now();
        tracing::info!("Loading dashboard for {} via {} backend", ticker, self.backend.backend_name());

        let (price, news, reddit, financials) = tokio::join!(
            self.backend.predict_price(&ticker),
            self.backend.news_sentiment(&ticker),
            self.backend.reddit_sentiment(&ticker),
            self.backend.financials(&ticker),
        );

        match (price, news, reddit, financials) {
            (Ok(price), Ok(news), Ok(reddit), Ok(financials)) => {
                let confidence = valid_confidence(financials.confidence);
                if confidence.is_none() && financials.confidence.is_some() {
                    tracing::warn!(
                        "Dropping out-of-range confidence {:?} for {}",
                        financials.confidence,
                        ticker
                    );
                }

                tracing::info!(
                    "Dashboard for {} loaded in {}ms ({} headlines, {} posts)",
                    ticker,
                    started.elapsed().as_millis(),
                    news.news.len(),
                    reddit.reddit.len()
                );

                Ok(DashboardResult {
                    ticker,
                    predicted_price: price.predicted_price,
                    news: news
                        .news
                        .into_iter()
                        .map(|n| NewsItem {
                            headline: n.headline,
                            sentiment: n.sentiment,
                        })
                        .collect(),
                    reddit: reddit
                        .reddit
                        .into_iter()
                        .map(|r| RedditPost {
                            post: r.post,
                            sentiment: r.sentiment,
                        })
                        .collect(),
                    financials: financials.financials,
                    direction: financials.direction,
                    confidence,
                    loaded_at: Utc::now(),
                })
            }
            (price, news, reddit, financials) => {
                let failures = [
                    (DashboardSection::Price, price.err()),
                    (DashboardSection::News, news.err()),
                    (DashboardSection::Reddit, reddit.err()),
                    (DashboardSection::Financials, financials.err()),
                ];

                let mut first: Option<DashboardError> = None;
                for (section, error) in failures {
                    if let Some(error) = error {
                        let failure = section_failure(&ticker, section, error);
                        if first.is_none() {
                            first = Some(failure);
                        }
                    }
                }

                Err(first.unwrap_or_else(|| {
                    DashboardError::section_failed(DashboardSection::Price, "unknown failure")
                }))
            }
        }
    }
}

fn section_failure(ticker: &str, section: DashboardSection, error: MLError) -> DashboardError {
    tracing::error!("{} API failed for {}: {}", section, ticker, error);
    DashboardError::section_failed(section, error.to_string())
}
