//! Typed decoding of quote API responses.
//!
//! Every response goes through the same envelope check first (credential
//! rejection, explicit error, empty body), then through a decoder for the
//! shape its `function` produces. Missing top-level data means the symbol
//! is unknown; present-but-malformed data is an unrecognized shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tdk_core::{AppError, QueryFunction, TimeRange};

/// Marker the upstream puts in `Information` when the key is rejected.
const INVALID_CREDENTIAL_MARKER: &str = "API key";
const QUOTE_KEY: &str = "Global Quote";
const SERIES_KEY: &str = "Time Series (Daily)";
const NEWS_KEY: &str = "feed";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x160?text=No+Image";

/// Articles shown per symbol.
pub const NEWS_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalQuote {
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub price: f64,
    pub volume: u64,
    pub latest_trading_day: Option<String>,
    pub previous_close: Option<f64>,
    pub change: f64,
    pub change_percent: f64,
}

impl GlobalQuote {
    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily bars in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySeries {
    pub bars: Vec<DailyBar>,
}

/// Suggested axis bounds for a chart window: 10% of the range as padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartBounds {
    pub min_low: f64,
    pub max_high: f64,
    pub buffer: f64,
}

impl ChartBounds {
    pub fn suggested_min(&self) -> f64 {
        self.min_low - self.buffer
    }

    pub fn suggested_max(&self) -> f64 {
        self.max_high + self.buffer
    }
}

impl DailySeries {
    /// The most recent `range.days()` bars, oldest first.
    pub fn window(&self, range: TimeRange) -> &[DailyBar] {
        let start = self.bars.len().saturating_sub(range.days());
        &self.bars[start..]
    }

    /// Bounds over a window; `None` for an empty window.
    pub fn bounds(bars: &[DailyBar]) -> Option<ChartBounds> {
        let first = bars.first()?;
        let (min_low, max_high) = bars
            .iter()
            .fold((first.low, first.high), |(lo, hi), bar| {
                (lo.min(bar.low), hi.max(bar.high))
            });
        Some(ChartBounds {
            min_low,
            max_high,
            buffer: (max_high - min_low) * 0.1,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub banner_image: Option<String>,
}

impl NewsArticle {
    pub fn banner_or_placeholder(&self) -> &str {
        self.banner_image
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewsFeed {
    pub articles: Vec<NewsArticle>,
}

impl NewsFeed {
    pub fn headlines(&self) -> &[NewsArticle] {
        &self.articles[..self.articles.len().min(NEWS_LIMIT)]
    }
}

/// Shared classification applied to every response body.
fn check_envelope<'a>(
    function: QueryFunction,
    symbol: &str,
    body: &'a Value,
) -> Result<&'a Map<String, Value>, AppError> {
    let Some(object) = body.as_object() else {
        return Err(unrecognized(function, "response is not a JSON object"));
    };
    if object
        .get("Information")
        .and_then(Value::as_str)
        .is_some_and(|info| info.contains(INVALID_CREDENTIAL_MARKER))
    {
        return Err(AppError::InvalidCredential);
    }
    if object.contains_key("Error Message") || object.is_empty() {
        return Err(AppError::SymbolNotFound(symbol.to_string()));
    }
    Ok(object)
}

/// A field counts as present when it is a number or a non-empty string.
fn has_value(value: &Value) -> bool {
    value.is_number() || value.as_str().is_some_and(|s| !s.is_empty())
}

pub fn decode_quote(symbol: &str, body: &Value) -> Result<GlobalQuote, AppError> {
    let function = QueryFunction::GlobalQuote;
    let object = check_envelope(function, symbol, body)?;
    let quote = object
        .get(QUOTE_KEY)
        .and_then(Value::as_object)
        .filter(|q| q.get("05. price").is_some_and(has_value))
        .ok_or_else(|| AppError::SymbolNotFound(symbol.to_string()))?;

    let change_percent = field_str(function, quote, "10. change percent")?;
    Ok(GlobalQuote {
        symbol: quote
            .get("01. symbol")
            .and_then(Value::as_str)
            .unwrap_or(symbol)
            .to_string(),
        open: field_f64(function, quote, "02. open")?,
        high: field_f64(function, quote, "03. high")?,
        low: field_f64(function, quote, "04. low")?,
        price: field_f64(function, quote, "05. price")?,
        volume: field_u64(function, quote, "06. volume")?,
        latest_trading_day: quote
            .get("07. latest trading day")
            .and_then(Value::as_str)
            .map(str::to_string),
        previous_close: field_f64(function, quote, "08. previous close").ok(),
        change: field_f64(function, quote, "09. change")?,
        change_percent: parse_f64(function, "10. change percent", change_percent.trim_end_matches('%'))?,
    })
}

pub fn decode_series(symbol: &str, body: &Value) -> Result<DailySeries, AppError> {
    let function = QueryFunction::TimeSeriesDaily;
    let object = check_envelope(function, symbol, body)?;
    let series = object
        .get(SERIES_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::SymbolNotFound(symbol.to_string()))?;

    let mut bars = Vec::with_capacity(series.len());
    for (date_str, bar) in series {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| unrecognized(function, &format!("invalid date {date_str}")))?;
        let bar = bar
            .as_object()
            .ok_or_else(|| unrecognized(function, &format!("bar for {date_str} is not an object")))?;
        bars.push(DailyBar {
            date,
            open: field_f64(function, bar, "1. open")?,
            high: field_f64(function, bar, "2. high")?,
            low: field_f64(function, bar, "3. low")?,
            close: field_f64(function, bar, "4. close")?,
            volume: field_u64(function, bar, "5. volume")?,
        });
    }
    bars.sort_by_key(|bar| bar.date);
    Ok(DailySeries { bars })
}

/// A body without `feed` decodes to an empty feed.
pub fn decode_news(symbol: &str, body: &Value) -> Result<NewsFeed, AppError> {
    let function = QueryFunction::NewsSentiment;
    let object = check_envelope(function, symbol, body)?;
    let Some(feed) = object.get(NEWS_KEY) else {
        return Ok(NewsFeed::default());
    };
    let articles: Vec<NewsArticle> = serde_json::from_value(feed.clone())
        .map_err(|e| unrecognized(function, &format!("feed: {e}")))?;
    Ok(NewsFeed { articles })
}

fn unrecognized(function: QueryFunction, detail: &str) -> AppError {
    AppError::UnrecognizedShape {
        function: function.as_str().to_string(),
        detail: detail.to_string(),
    }
}

fn field_str<'a>(
    function: QueryFunction,
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a str, AppError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| unrecognized(function, &format!("missing field {key:?}")))
}

fn parse_f64(function: QueryFunction, key: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| unrecognized(function, &format!("field {key:?} is not numeric: {raw:?}")))
}

fn field_f64(function: QueryFunction, obj: &Map<String, Value>, key: &str) -> Result<f64, AppError> {
    if let Some(n) = obj.get(key).and_then(Value::as_f64) {
        return Ok(n);
    }
    parse_f64(function, key, field_str(function, obj, key)?)
}

fn field_u64(function: QueryFunction, obj: &Map<String, Value>, key: &str) -> Result<u64, AppError> {
    if let Some(n) = obj.get(key).and_then(Value::as_u64) {
        return Ok(n);
    }
    let raw = field_str(function, obj, key)?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| unrecognized(function, &format!("field {key:?} is not an integer: {raw:?}")))
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
