use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DashboardError;

/// A known ticker candidate.
///
/// The code is always stored upper-cased so it can be used directly as a
/// lookup and navigation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Symbol {
    pub symbol: String,
    pub name: String,
}

impl Symbol {
    /// Build a symbol, upper-casing the code. A blank name falls back to the code.
    pub fn new(symbol: impl AsRef<str>, name: impl Into<String>) -> Self {
        let symbol = symbol.as_ref().trim().to_uppercase();
        let name = name.into();
        let name = if name.trim().is_empty() {
            symbol.clone()
        } else {
            name
        };
        Self { symbol, name }
    }

    /// A symbol whose display name is unknown.
    pub fn bare(symbol: impl AsRef<str>) -> Self {
        Self::new(symbol, String::new())
    }
}

/// Trim and upper-case a user supplied ticker.
pub fn normalize_ticker(raw: &str) -> Result<String, DashboardError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(DashboardError::InvalidTicker);
    }
    Ok(ticker)
}

/// The four independently fetched parts of a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DashboardSection {
    Price,
    News,
    Reddit,
    Financials,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 4] = [
        DashboardSection::Price,
        DashboardSection::News,
        DashboardSection::Reddit,
        DashboardSection::Financials,
    ];
}

impl fmt::Display for DashboardSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DashboardSection::Price => "Price",
            DashboardSection::News => "News",
            DashboardSection::Reddit => "Reddit",
            DashboardSection::Financials => "Financials",
        };
        f.write_str(label)
    }
}

/// Sentiment classes emitted by the backend classifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Other(String),
}

impl SentimentLabel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "neutral" => SentimentLabel::Neutral,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Other(raw.to_string()),
        }
    }
}

/// A news headline with its classified sentiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewsItem {
    pub headline: String,
    pub sentiment: String,
}

impl NewsItem {
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::parse(&self.sentiment)
    }
}

/// A Reddit post with its classified sentiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RedditPost {
    pub post: String,
    pub sentiment: String,
}

impl RedditPost {
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::parse(&self.sentiment)
    }
}

/// Consolidated view model for one ticker.
///
/// Built only when every section loaded successfully. Optional backend
/// fields that were missing from a response are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardResult {
    pub ticker: String,
    pub predicted_price: Option<f64>,
    pub news: Vec<NewsItem>,
    pub reddit: Vec<RedditPost>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub financials: Option<serde_json::Value>,
    pub direction: Option<String>,
    /// Always within `[0, 1]` when present
    pub confidence: Option<f64>,
    pub loaded_at: DateTime<Utc>,
}

/// Keep a confidence only if it is a probability.
pub fn valid_confidence(value: Option<f64>) -> Option<f64> {
    value.filter(|c| c.is_finite() && (0.0..=1.0).contains(c))
}
