use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Chat session mode: network-backed or local canned responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Live,
    Demo,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Demo => "demo",
        }
    }
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quote API `function` query parameter values used by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryFunction {
    GlobalQuote,
    TimeSeriesDaily,
    NewsSentiment,
}

impl QueryFunction {
    /// Wire name sent as the `function` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalQuote => "GLOBAL_QUOTE",
            Self::TimeSeriesDaily => "TIME_SERIES_DAILY",
            Self::NewsSentiment => "NEWS_SENTIMENT",
        }
    }
}

impl std::fmt::Display for QueryFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chart window selectable on the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[value(name = "1M")]
    OneMonth,
    #[value(name = "3M")]
    ThreeMonths,
    #[value(name = "6M")]
    SixMonths,
    #[value(name = "1Y")]
    OneYear,
}

impl TimeRange {
    /// Number of most recent daily bars shown for this range.
    pub fn days(&self) -> usize {
        match self {
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
        }
    }
}

/// Output format for CLI responses
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Render a secret for logs: first four characters, rest elided.
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}...")
}
