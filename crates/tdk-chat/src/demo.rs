//! Canned strategy answers used once a session has fallen back to demo mode.

struct DemoRule {
    keywords: &'static [&'static str],
    response: &'static str,
}

/// Checked in order; the first rule with a matching keyword answers.
const RULES: [DemoRule; 4] = [
    DemoRule {
        keywords: &["stock", "stocks", "equity"],
        response: "Based on your interest in stocks, here's a recommended strategy:

Diversified Growth Strategy
Allocation: 60% large-cap, 30% mid-cap, 10% small-cap stocks
Time Horizon: Medium to long-term (3-5+ years)
Risk Level: Moderate
Approach: Focus on quality companies with strong fundamentals and growth potential. Consider dollar-cost averaging to reduce timing risk.",
    },
    DemoRule {
        keywords: &["crypto", "bitcoin", "ethereum"],
        response: "Based on your interest in crypto, here's a recommended strategy:

Crypto Core-Satellite Strategy
Allocation: 60% Bitcoin/Ethereum, 40% alt-coins
Time Horizon: Variable (1-5 years)
Risk Level: High
Approach: Hold core positions in established cryptocurrencies while taking calculated positions in promising alt-coins. Set strict stop-loss levels and consider DCA during major market corrections.",
    },
    DemoRule {
        keywords: &["forex", "currency", "trading"],
        response: "Based on your interest in forex trading, here's a recommended strategy:

Trend-Following Forex Strategy
Pairs Focus: Major pairs (EUR/USD, GBP/USD, USD/JPY)
Time Horizon: Short to medium-term
Risk Level: Moderate to High
Approach: Utilize moving average crossovers and momentum indicators to identify trending markets. Implement proper position sizing (1-2% risk per trade) and maintain consistent risk-reward ratios of at least 1:2.",
    },
    DemoRule {
        keywords: &["etf", "index", "passive"],
        response: "Based on your interest in passive investing, here's a recommended strategy:

Global ETF Portfolio
Allocation: 60% broad market ETFs, 20% sector-specific ETFs, 20% bond ETFs
Time Horizon: Long-term (5+ years)
Risk Level: Low to Moderate
Approach: Build a core portfolio with low-cost broad market ETFs. Add satellite positions in sector ETFs that align with long-term economic trends. Rebalance annually to maintain target allocation.",
    },
];

const CLARIFYING_QUESTION: &str = "To generate a trading strategy, I need more specific information. Could you tell me:

1. What assets are you interested in? (stocks, crypto, forex, etc.)
2. What's your risk tolerance? (low, moderate, high)
3. What's your investment timeframe?";

/// Answer `message` without touching the network.
///
/// Keywords match as case-insensitive substrings, so "stockholder" hits the
/// stock rule.
pub fn demo_response(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
        .map_or(CLARIFYING_QUESTION, |rule| rule.response)
}
