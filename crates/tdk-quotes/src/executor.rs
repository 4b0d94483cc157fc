//! Quote API calls: one credential per request, classified responses.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tdk_core::{AppError, QueryFunction};
use tracing::{debug, warn};

use crate::payload::{self, DailySeries, GlobalQuote, NewsFeed};
use crate::rotation::KeyRotationClient;

/// Everything the dashboard shows for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub quote: GlobalQuote,
    pub series: DailySeries,
    pub news: NewsFeed,
}

/// Default bound on one quote API request, body included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trim and upper-case a user-typed symbol.
pub fn normalize_symbol(raw: &str) -> Result<String, AppError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::EmptySymbol);
    }
    Ok(symbol)
}

#[derive(Debug, Clone)]
pub struct QuoteQueryExecutor {
    credentials: Arc<KeyRotationClient>,
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl QuoteQueryExecutor {
    pub fn new(credentials: Arc<KeyRotationClient>, base_url: impl Into<String>) -> Self {
        Self::with_client(credentials, base_url, reqwest::Client::new())
    }

    pub fn with_client(
        credentials: Arc<KeyRotationClient>,
        base_url: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn fetch_quote(&self, symbol: &str) -> Result<GlobalQuote, AppError> {
        let symbol = normalize_symbol(symbol)?;
        let body = self.fetch_raw(QueryFunction::GlobalQuote, &symbol).await?;
        payload::decode_quote(&symbol, &body)
    }

    pub async fn fetch_series(&self, symbol: &str) -> Result<DailySeries, AppError> {
        let symbol = normalize_symbol(symbol)?;
        let body = self.fetch_raw(QueryFunction::TimeSeriesDaily, &symbol).await?;
        payload::decode_series(&symbol, &body)
    }

    pub async fn fetch_news(&self, symbol: &str) -> Result<NewsFeed, AppError> {
        let symbol = normalize_symbol(symbol)?;
        let body = self.fetch_raw(QueryFunction::NewsSentiment, &symbol).await?;
        payload::decode_news(&symbol, &body)
    }

    /// Quote, series and news fetched concurrently. The first failure wins
    /// and no partial snapshot is produced.
    pub async fn fetch_snapshot(&self, symbol: &str) -> Result<SymbolSnapshot, AppError> {
        let symbol = normalize_symbol(symbol)?;
        let (quote, series, news) = tokio::try_join!(
            self.fetch_quote(&symbol),
            self.fetch_series(&symbol),
            self.fetch_news(&symbol),
        )?;
        Ok(SymbolSnapshot {
            symbol,
            quote,
            series,
            news,
        })
    }

    async fn fetch_raw(&self, function: QueryFunction, symbol: &str) -> Result<Value, AppError> {
        let apikey = self.credentials.next_credential()?;
        let url = Url::parse_with_params(
            &format!("{}/query", self.base_url),
            [
                ("function", function.as_str()),
                ("symbol", symbol),
                ("apikey", apikey.as_str()),
            ],
        )
        .map_err(|e| AppError::ConfigError(format!("invalid quote API base URL: {e}")))?;

        debug!(%function, symbol, "Quote API request");
        let secs = self.timeout.as_secs_f64().ceil() as u64;
        let text = tokio::time::timeout(self.timeout, self.fetch_text(url, function, symbol))
            .await
            .map_err(|_| {
                warn!(%function, symbol, secs, "Quote API request timed out");
                AppError::Timeout { secs }
            })??;
        serde_json::from_str(&text).map_err(|e| AppError::UnrecognizedShape {
            function: function.as_str().to_string(),
            detail: format!("body is not JSON: {e}"),
        })
    }

    async fn fetch_text(
        &self,
        url: Url,
        function: QueryFunction,
        symbol: &str,
    ) -> Result<String, AppError> {
        let response = self.http.get(url).send().await.map_err(|e| {
            // reqwest errors embed the URL, which carries the key.
            let e = e.without_url();
            warn!(%function, symbol, error = %e, "Quote API request failed");
            AppError::UpstreamUnavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%function, symbol, %status, "Quote API returned error status");
            return Err(AppError::UpstreamUnavailable(status.to_string()));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.without_url().to_string()))
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
