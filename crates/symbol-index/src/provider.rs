//! Candidate providers
//!
//! Where the ticker universe comes from. Both providers feed the same
//! [`SymbolIndex::rank`](crate::SymbolIndex::rank); only the source differs.

use async_trait::async_trait;
use dashboard_core::Symbol;
use serde::Deserialize;
use std::time::Duration;

use crate::popular::popular_symbols;

/// Debounce applied before hitting the symbol-lookup endpoint
pub const REMOTE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Source of ticker candidates for a query.
///
/// Providers never fail: an unreachable source yields no candidates so the
/// search box keeps working.
#[async_trait]
pub trait SymbolProvider: Send + Sync {
    async fn candidates(&self, query: &str) -> Vec<Symbol>;

    /// Quiet period to wait after a keystroke before asking for candidates.
    fn debounce(&self) -> Option<Duration> {
        None
    }

    fn name(&self) -> &'static str;
}

/// Fixed in-memory universe; the built-in popular list by default.
#[derive(Debug, Clone)]
pub struct StaticSymbolProvider {
    symbols: Vec<Symbol>,
}

impl Default for StaticSymbolProvider {
    fn default() -> Self {
        Self::new(popular_symbols())
    }
}

impl StaticSymbolProvider {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

#[async_trait]
impl SymbolProvider for StaticSymbolProvider {
    async fn candidates(&self, _query: &str) -> Vec<Symbol> {
        self.symbols.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: Option<Vec<Symbol>>,
}

/// Candidates from the server-side symbol-lookup proxy (`GET /api/symbols`).
///
/// The upstream provider credential stays on the server; this client only
/// knows the proxy's base URL.
#[derive(Clone)]
pub struct RemoteSymbolProvider {
    client: reqwest::Client,
    base_url: String,
    debounce: Duration,
}

impl RemoteSymbolProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            debounce: REMOTE_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Symbol>, String> {
        let url = format!("{}/api/symbols", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query.trim())])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("Status: {}", response.status()));
        }

        let body = response
            .json::<LookupResponse>()
            .await
            .map_err(|e| e.to_string())?;

        Ok(body
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|s| Symbol::new(&s.symbol, s.name))
            .filter(|s| !s.symbol.is_empty())
            .collect())
    }
}

#[async_trait]
impl SymbolProvider for RemoteSymbolProvider {
    async fn candidates(&self, query: &str) -> Vec<Symbol> {
        match self.lookup(query).await {
            Ok(symbols) => symbols,
            Err(e) => {
                tracing::warn!("Symbol lookup for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }

    fn debounce(&self) -> Option<Duration> {
        Some(self.debounce)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
