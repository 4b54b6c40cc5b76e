//! Search box state
//!
//! Holds the current query, the candidates last obtained for it and the
//! ranked suggestions. Every keystroke recomputes suggestions from scratch;
//! keystrokes superseded by a later one are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use dashboard_core::Symbol;

use crate::provider::SymbolProvider;
use crate::ranker::{normalize_query, SymbolIndex};

/// Request to open the dashboard for a ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Upper-cased ticker code
    pub symbol: String,
}

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    candidates: Vec<Symbol>,
    suggestions: Vec<Symbol>,
}

pub struct SymbolSearch<P> {
    provider: P,
    index: SymbolIndex,
    keystrokes: AtomicU64,
    state: Mutex<SearchState>,
}

impl<P: SymbolProvider> SymbolSearch<P> {
    pub fn new(provider: P) -> Self {
        Self::with_index(provider, SymbolIndex::default())
    }

    pub fn with_index(provider: P, index: SymbolIndex) -> Self {
        Self {
            provider,
            index,
            keystrokes: AtomicU64::new(0),
            state: Mutex::new(SearchState::default()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Handle a change of the query text.
    ///
    /// Returns the new suggestions, or `None` when a later call arrived while
    /// this one was waiting out the debounce or fetching candidates.
    pub async fn input(&self, query: &str) -> Option<Vec<Symbol>> {
        let keystroke = self.keystrokes.fetch_add(1, Ordering::SeqCst) + 1;
        self.with_state(|state| state.query = query.to_string());

        if normalize_query(query).is_empty() {
            self.with_state(|state| state.suggestions.clear());
            return Some(Vec::new());
        }

        if let Some(quiet) = self.provider.debounce() {
            tokio::time::sleep(quiet).await;
            if self.is_stale(keystroke) {
                tracing::trace!("Dropping debounced keystroke {:?}", query);
                return None;
            }
        }

        let candidates = self.provider.candidates(query).await;
        if self.is_stale(keystroke) {
            return None;
        }

        let ranked = self.index.rank(query, &candidates);
        tracing::debug!(
            "{} suggestions for {:?} from {} {} candidates",
            ranked.len(),
            query,
            candidates.len(),
            self.provider.name()
        );
        self.with_state(|state| {
            state.candidates = candidates;
            state.suggestions = ranked.clone();
        });
        Some(ranked)
    }

    pub fn query(&self) -> String {
        self.with_state(|state| state.query.clone())
    }

    pub fn suggestions(&self) -> Vec<Symbol> {
        self.with_state(|state| state.suggestions.clone())
    }

    /// The user picked a suggestion.
    pub fn select(&self, symbol: &str) -> Option<Navigation> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }
        self.with_state(|state| {
            state.query = symbol.clone();
            state.suggestions.clear();
        });
        Some(Navigation { symbol })
    }

    /// The user pressed Enter. Navigates only when the query is exactly a
    /// known ticker (case-insensitive); anything else is ignored.
    pub fn confirm(&self) -> Option<Navigation> {
        let resolved = self.with_state(|state| {
            let wanted = state.query.trim();
            if wanted.is_empty() {
                return None;
            }
            state
                .candidates
                .iter()
                .chain(state.suggestions.iter())
                .find(|s| s.symbol.eq_ignore_ascii_case(wanted))
                .map(|s| s.symbol.to_uppercase())
        })?;
        self.select(&resolved)
    }

    fn is_stale(&self, keystroke: u64) -> bool {
        self.keystrokes.load(Ordering::SeqCst) != keystroke
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SearchState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }
}
