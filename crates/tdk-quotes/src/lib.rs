//! Quote dashboard core: credential rotation, quote/series/news fetches with
//! response classification, and symbol suggestions.

pub mod executor;
pub mod payload;
pub mod rotation;
pub mod suggest;

pub use executor::{
    DEFAULT_REQUEST_TIMEOUT, QuoteQueryExecutor, SymbolSnapshot, normalize_symbol,
};
pub use payload::{
    ChartBounds, DailyBar, DailySeries, GlobalQuote, NEWS_LIMIT, NewsArticle, NewsFeed,
};
pub use rotation::{CredentialPool, KeyRotationClient};
pub use suggest::{StockSuggestion, suggest};
