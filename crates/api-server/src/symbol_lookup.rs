//! Server-side ticker lookup.
//!
//! Wraps the Polygon reference search so the API key stays on the server,
//! caches successful lookups and feeds ranked suggestions.

use chrono::{DateTime, Utc};
use dashboard_core::Symbol;
use dashmap::DashMap;
use polygon_client::PolygonClient;
use symbol_index::{normalize_query, popular_symbols, SymbolIndex};

const CACHE_TTL_SECS: i64 = 300; // 5 minutes

/// Hard cap on cached queries; new results are served uncached past it
const MAX_CACHE_ENTRIES: usize = 1024;

pub const DEFAULT_LOOKUP_LIMIT: usize = 20;
pub const MAX_LOOKUP_LIMIT: usize = 50;

/// Returned when no upstream credential is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupNotConfigured;

struct CacheEntry {
    symbols: Vec<Symbol>,
    cached_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        (now - self.cached_at).num_seconds() < CACHE_TTL_SECS
    }
}

pub struct SymbolLookup {
    polygon: Option<PolygonClient>,
    index: SymbolIndex,
    /// Keyed by (normalized query, limit)
    cache: DashMap<String, CacheEntry>,
}

impl SymbolLookup {
    pub fn new(polygon: Option<PolygonClient>) -> Self {
        Self {
            polygon,
            index: SymbolIndex::default(),
            cache: DashMap::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.polygon.is_some()
    }

    /// Look up tickers matching `query`.
    ///
    /// Upstream failures are logged and yield an empty list; only a missing
    /// credential is reported to the caller.
    pub async fn lookup(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Symbol>, LookupNotConfigured> {
        let Some(polygon) = &self.polygon else {
            return Err(LookupNotConfigured);
        };

        let query = normalize_query(query);
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit.clamp(1, MAX_LOOKUP_LIMIT);

        let cache_key = format!("{}:{}", query, limit);
        if let Some(entry) = self.cache.get(&cache_key) {
            if entry.is_fresh(Utc::now()) {
                return Ok(entry.symbols.clone());
            }
        }

        match polygon.search_tickers(&query, limit).await {
            Ok(results) => {
                let symbols: Vec<Symbol> = results
                    .into_iter()
                    .map(|r| Symbol::new(&r.ticker, r.name))
                    .collect();
                tracing::debug!("Symbol lookup '{}' returned {} results", query, symbols.len());
                self.store(cache_key, &symbols);
                Ok(symbols)
            }
            Err(e) => {
                tracing::error!("Symbol lookup '{}' failed: {}", query, e);
                Ok(Vec::new())
            }
        }
    }

    /// Cache `symbols`, dropping expired entries first. Keys are client
    /// controlled, so the map is also capped.
    fn store(&self, cache_key: String, symbols: &[Symbol]) {
        let now = Utc::now();
        self.cache.retain(|_, entry| entry.is_fresh(now));
        if self.cache.len() >= MAX_CACHE_ENTRIES {
            tracing::debug!("Symbol cache full; not caching '{}'", cache_key);
            return;
        }
        self.cache.insert(
            cache_key,
            CacheEntry {
                symbols: symbols.to_vec(),
                cached_at: now,
            },
        );
    }

    /// Ranked suggestions for `query`, drawn from the upstream lookup when
    /// configured and from the popular list otherwise.
    pub async fn suggest(&self, query: &str) -> Vec<Symbol> {
        let candidates = match self.lookup(query, MAX_LOOKUP_LIMIT).await {
            Ok(symbols) => symbols,
            Err(LookupNotConfigured) => popular_symbols(),
        };
        self.index.rank(query, &candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve;
    use axum::{routing::get, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn upstream(rate_limit: usize) -> (PolygonClient, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/v3/reference/tickers",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "results": [{ "ticker": "MSFT", "name": "Microsoft Corporation" }] }))
                }
            }),
        );
        let client = PolygonClient::new("test-key".to_string())
            .with_base_url(serve(router).await)
            .with_rate_limit(rate_limit);
        (client, hits)
    }

    fn expired_entry() -> CacheEntry {
        CacheEntry {
            symbols: vec![Symbol::new("OLD", "Stale Corp")],
            cached_at: Utc::now() - chrono::Duration::seconds(CACHE_TTL_SECS + 1),
        }
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let (polygon, _) = upstream(100).await;
        let lookup = SymbolLookup::new(Some(polygon));
        for i in 0..50 {
            lookup.cache.insert(format!("q{}:20", i), expired_entry());
        }

        lookup.lookup("ms", 20).await.unwrap();

        assert_eq!(lookup.cache.len(), 1);
        assert!(lookup.cache.contains_key("ms:20"));
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (polygon, hits) = upstream(100).await;
        let lookup = SymbolLookup::new(Some(polygon));
        lookup.cache.insert("ms:20".to_string(), expired_entry());

        let symbols = lookup.lookup("MS", 20).await.unwrap();
        assert_eq!(symbols, vec![Symbol::new("MSFT", "Microsoft Corporation")]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_is_capped() {
        let (polygon, _) = upstream(100).await;
        let lookup = SymbolLookup::new(Some(polygon));
        for i in 0..MAX_CACHE_ENTRIES {
            lookup.cache.insert(
                format!("q{}:20", i),
                CacheEntry {
                    symbols: Vec::new(),
                    cached_at: Utc::now(),
                },
            );
        }

        let symbols = lookup.lookup("ms", 20).await.unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(lookup.cache.len(), MAX_CACHE_ENTRIES);
        assert!(!lookup.cache.contains_key("ms:20"));
    }

    #[tokio::test]
    async fn test_exhausted_rate_limit_degrades_to_empty_list() {
        let (polygon, hits) = upstream(2).await;
        let lookup = SymbolLookup::new(Some(polygon));

        assert_eq!(lookup.lookup("m", 20).await.unwrap().len(), 1);
        assert_eq!(lookup.lookup("ms", 20).await.unwrap().len(), 1);

        // A third keystroke inside the same minute must not queue for a slot.
        let third = tokio::time::timeout(std::time::Duration::from_secs(5), lookup.lookup("msf", 20))
            .await
            .expect("lookup blocked on the rate limiter");
        assert_eq!(third, Ok(Vec::new()));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(!lookup.cache.contains_key("msf:20"));
    }
}
