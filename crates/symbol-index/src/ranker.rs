//! Suggestion Ranking
//!
//! Prefix-matches a query against a candidate universe and orders the hits:
//! code matches before name matches, popular tickers first inside each
//! bucket, then alphabetical by code.

use std::cmp::Ordering;
use std::collections::HashSet;

use dashboard_core::Symbol;

use crate::popular::POPULAR_SYMBOLS;

/// Upper bound on suggestions shown under the search box
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Trim and lower-case a raw query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Ranks ticker candidates against a typed query.
#[derive(Debug, Clone)]
pub struct SymbolIndex {
    popular: HashSet<String>,
    limit: Option<usize>,
    match_names: bool,
}

impl Default for SymbolIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolIndex {
    /// Built-in popular set, 10 suggestions, display names searched.
    pub fn new() -> Self {
        Self::with_popular(POPULAR_SYMBOLS.iter().map(|(code, _)| *code))
    }

    /// Use a custom popular set
    pub fn with_popular<I, S>(popular: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            popular: popular
                .into_iter()
                .map(|code| code.as_ref().trim().to_uppercase())
                .collect(),
            limit: Some(DEFAULT_SUGGESTION_LIMIT),
            match_names: true,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn without_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Only match on ticker codes; for candidate sources without display names.
    pub fn symbols_only(mut self) -> Self {
        self.match_names = false;
        self
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_popular(&self, code: &str) -> bool {
        self.popular.contains(code)
    }

    /// Rank `candidates` for `query`.
    ///
    /// Pure: the same inputs always give the same ordered output. Candidates
    /// repeating an earlier code are ignored, so codes never repeat.
    pub fn rank(&self, query: &str, candidates: &[Symbol]) -> Vec<Symbol> {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
        let mut by_symbol = Vec::new();
        let mut by_name = Vec::new();

        for candidate in candidates {
            let symbol = Symbol::new(&candidate.symbol, candidate.name.clone());
            if symbol.symbol.is_empty() || !seen.insert(symbol.symbol.clone()) {
                continue;
            }

            if symbol.symbol.to_lowercase().starts_with(&needle) {
                by_symbol.push(symbol);
            } else if self.match_names && symbol.name.to_lowercase().starts_with(&needle) {
                by_name.push(symbol);
            }
        }

        by_symbol.sort_by(|a, b| self.compare(a, b));
        by_name.sort_by(|a, b| self.compare(a, b));

        let mut ranked = by_symbol;
        ranked.extend(by_name);
        if let Some(limit) = self.limit {
            ranked.truncate(limit);
        }
        ranked
    }

    fn compare(&self, a: &Symbol, b: &Symbol) -> Ordering {
        let a_popular = self.is_popular(&a.symbol);
        let b_popular = self.is_popular(&b.symbol);
        b_popular
            .cmp(&a_popular)
            .then_with(|| a.symbol.cmp(&b.symbol))
    }
}
