use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tdk_config::{GlobalConfig, credentials_template};
use tdk_core::{AppError, OutputFormat, TimeRange};
use tdk_quotes::{
    ChartBounds, DailyBar, DailySeries, GlobalQuote, KeyRotationClient, NewsArticle,
    QuoteQueryExecutor, StockSuggestion, SymbolSnapshot, suggest,
};

#[derive(Serialize)]
struct SnapshotView<'a> {
    symbol: &'a str,
    quote: &'a GlobalQuote,
    range: &'static str,
    bars: &'a [DailyBar],
    bounds: Option<ChartBounds>,
    news: Vec<NewsView<'a>>,
}

#[derive(Serialize)]
struct NewsView<'a> {
    title: &'a str,
    summary: &'a str,
    url: &'a str,
    image: &'a str,
}

pub(crate) async fn handle_quote(
    symbol: String,
    range: TimeRange,
    format: OutputFormat,
) -> Result<()> {
    let config = GlobalConfig::load_validated()?;
    let credentials = Arc::new(KeyRotationClient::new());
    if let Err(e) = credentials.initialize_from_path(&config.quotes.credentials_path) {
        if matches!(e, AppError::ConfigError(_)) {
            eprintln!(
                "Create {} with your API keys, for example:\n{}",
                config.quotes.credentials_path.display(),
                credentials_template()
            );
        }
        return Err(e.into());
    }

    let executor = QuoteQueryExecutor::new(credentials, config.quotes.base_url.clone())
        .with_timeout(Duration::from_secs(config.quotes.timeout_secs));
    let snapshot = executor.fetch_snapshot(&symbol).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot_view(&snapshot, range))?);
        }
        OutputFormat::Text => print!("{}", render_snapshot(&snapshot, range)),
    }
    Ok(())
}

pub(crate) fn handle_suggest(query: String, format: OutputFormat) -> Result<()> {
    let matches = suggest(&query);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matches)?),
        OutputFormat::Text => print!("{}", render_suggestions(&matches)),
    }
    Ok(())
}

fn snapshot_view(snapshot: &SymbolSnapshot, range: TimeRange) -> SnapshotView<'_> {
    let bars = snapshot.series.window(range);
    SnapshotView {
        symbol: &snapshot.symbol,
        quote: &snapshot.quote,
        range: range.as_str(),
        bars,
        bounds: DailySeries::bounds(bars),
        news: snapshot
            .news
            .headlines()
            .iter()
            .map(|a: &NewsArticle| NewsView {
                title: &a.title,
                summary: &a.summary,
                url: &a.url,
                image: a.banner_or_placeholder(),
            })
            .collect(),
    }
}

fn render_snapshot(snapshot: &SymbolSnapshot, range: TimeRange) -> String {
    let q = &snapshot.quote;
    let mut out = String::new();
    let sign = if q.is_positive() { "+" } else { "" };
    let _ = writeln!(
        out,
        "{}  {:.2}  {sign}{:.2} ({sign}{:.2}%)",
        q.symbol, q.price, q.change, q.change_percent
    );
    let _ = writeln!(
        out,
        "Open {:.2}  High {:.2}  Low {:.2}  Volume {}",
        q.open, q.high, q.low, q.volume
    );
    if let Some(day) = &q.latest_trading_day {
        let _ = writeln!(out, "Latest trading day {day}");
    }

    let bars = snapshot.series.window(range);
    out.push('\n');
    match (bars.first(), bars.last(), DailySeries::bounds(bars)) {
        (Some(first), Some(last), Some(bounds)) => {
            let _ = writeln!(
                out,
                "{} history: {} trading days, {} to {}",
                range.as_str(),
                bars.len(),
                first.date,
                last.date
            );
            let _ = writeln!(
                out,
                "Close {:.2} -> {:.2}  Range {:.2} - {:.2}",
                first.close, last.close, bounds.min_low, bounds.max_high
            );
        }
        _ => {
            let _ = writeln!(out, "{} history: no data", range.as_str());
        }
    }

    out.push('\n');
    let headlines = snapshot.news.headlines();
    if headlines.is_empty() {
        let _ = writeln!(out, "No recent news");
    } else {
        let _ = writeln!(out, "Recent news");
        for article in headlines {
            let _ = writeln!(out, "  * {}\n    {}", article.title, article.url);
        }
    }
    out
}

fn render_suggestions(matches: &[StockSuggestion]) -> String {
    matches
        .iter()
        .map(|s| format!("{:<6} {}\n", s.symbol, s.name))
        .collect()
}
