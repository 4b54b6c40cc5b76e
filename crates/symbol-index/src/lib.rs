//! Symbol Index
//!
//! Ticker autosuggest: a pure prefix-match ranker over a candidate universe,
//! interchangeable candidate providers (built-in popular list or the
//! symbol-lookup proxy) and a small search state holder that turns
//! keystrokes into ranked suggestions and navigation requests.

pub mod popular;
pub mod provider;
pub mod ranker;
pub mod search;

pub use popular::{is_popular, popular_symbols, POPULAR_SYMBOLS};
pub use provider::{RemoteSymbolProvider, StaticSymbolProvider, SymbolProvider};
pub use ranker::{normalize_query, SymbolIndex, DEFAULT_SUGGESTION_LIMIT};
pub use search::{Navigation, SymbolSearch};
