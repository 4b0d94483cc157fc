use serde::Serialize;

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockSuggestion {
    pub symbol: &'static str,
    pub name: &'static str,
}

const POPULAR: [StockSuggestion; 8] = [
    StockSuggestion { symbol: "AAPL", name: "Apple Inc." },
    StockSuggestion { symbol: "MSFT", name: "Microsoft Corporation" },
    StockSuggestion { symbol: "GOOGL", name: "Alphabet Inc." },
    StockSuggestion { symbol: "AMZN", name: "Amazon.com Inc." },
    StockSuggestion { symbol: "META", name: "Meta Platforms, Inc." },
    StockSuggestion { symbol: "TSLA", name: "Tesla, Inc." },
    StockSuggestion { symbol: "NVDA", name: "NVIDIA Corporation" },
    StockSuggestion { symbol: "AMD", name: "Advanced Micro Devices, Inc." },
];

/// Popular symbols whose ticker or upper-cased name contains the query.
pub fn suggest(query: &str) -> Vec<StockSuggestion> {
    let query = query.trim().to_uppercase();
    if query.is_empty() {
        return Vec::new();
    }
    POPULAR
        .iter()
        .filter(|s| s.symbol.contains(&query) || s.name.to_uppercase().contains(&query))
        .take(MAX_SUGGESTIONS)
        .copied()
        .collect()
}
