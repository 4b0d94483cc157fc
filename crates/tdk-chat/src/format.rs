//! Strategy card extraction for model replies.
//!
//! Best effort: a reply that talks about a strategy gets a card with a title
//! and up to five key points pulled from its list items or, failing that,
//! from sentences mentioning allocation, risk and the like.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

const TRIGGERS: [&str; 3] = ["strategy", "recommend", "portfolio"];
const TITLE_WORDS: [&str; 3] = ["strategy", "portfolio", "plan"];
const SENTENCE_WORDS: [&str; 6] = [
    "allocation",
    "risk",
    "invest",
    "strategy",
    "portfolio",
    "recommend",
];
const DEFAULT_TITLE: &str = "Trading Strategy Recommendation";
const MAX_KEY_POINTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyCard {
    pub title: String,
    pub key_points: Vec<String>,
}

/// A model reply plus the card derived from it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedReply {
    pub raw: String,
    pub card: Option<StrategyCard>,
}

impl FormattedReply {
    pub fn parse(raw: &str) -> Self {
        let card = TRIGGERS
            .iter()
            .any(|t| raw.contains(t))
            .then(|| StrategyCard {
                title: find_title(raw),
                key_points: extract_key_points(raw),
            });
        Self {
            raw: raw.to_string(),
            card,
        }
    }

    /// Browser rendering: the raw reply followed by an escaped card block.
    pub fn to_markup(&self) -> String {
        let Some(card) = &self.card else {
            return self.raw.clone();
        };
        let items: String = card
            .key_points
            .iter()
            .map(|p| format!("<li>{}</li>", escape_html(p)))
            .collect();
        format!(
            "{}\n\n<div class=\"strategy-card\">\n  <h3>{}</h3>\n  <p><strong>Key Points:</strong></p>\n  <ul>{}</ul>\n</div>",
            self.raw,
            escape_html(&card.title),
            items
        )
    }

    /// Terminal rendering.
    pub fn to_plain(&self) -> String {
        let Some(card) = &self.card else {
            return self.raw.clone();
        };
        let mut out = format!("{}\n\n== {} ==\nKey Points:", self.raw, card.title);
        for point in &card.key_points {
            out.push_str("\n  - ");
            out.push_str(point);
        }
        out
    }
}

/// Markup rendering of `raw`; unchanged when no card applies.
pub fn format(raw: &str) -> String {
    FormattedReply::parse(raw).to_markup()
}

fn find_title(raw: &str) -> String {
    raw.lines()
        .find(|line| {
            let lower = line.to_lowercase();
            TITLE_WORDS.iter().any(|w| lower.contains(w))
        })
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

struct Patterns {
    list_item: Regex,
    sentence: Regex,
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(Patterns {
                list_item: Regex::new(r"^\s*(?:[•*-]|\d+\.)\s+(.+)$").ok()?,
                sentence: Regex::new(r"[^.!?]+[.!?]+").ok()?,
            })
        })
        .as_ref()
}

fn extract_key_points(raw: &str) -> Vec<String> {
    let Some(patterns) = patterns() else {
        return Vec::new();
    };

    let listed: Vec<String> = raw
        .lines()
        .filter_map(|line| patterns.list_item.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .take(MAX_KEY_POINTS)
        .collect();
    if !listed.is_empty() {
        return listed;
    }

    patterns
        .sentence
        .find_iter(raw)
        .map(|m| m.as_str().trim())
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            SENTENCE_WORDS.iter().any(|w| lower.contains(w))
        })
        .take(MAX_KEY_POINTS)
        .map(str::to_string)
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let raw = "Hello! Markets were quiet today.\nNothing else to add.";
        assert_eq!(format(raw), raw);
        assert_eq!(FormattedReply::parse(raw).to_plain(), raw);
        assert!(FormattedReply::parse(raw).card.is_none());
    }

    #[test]
    fn test_trigger_is_case_sensitive() {
        assert!(FormattedReply::parse("Strategy: buy").card.is_none());
        assert!(FormattedReply::parse("my strategy: buy").card.is_some());
    }

    #[test]
    fn test_card_from_list_items() {
        let raw = "Here is a balanced portfolio plan\n\n\
                   - 60% equities\n\
                   * 30% bonds\n\
                   • 10% cash\n\
                   1. Rebalance yearly\n\
                   **Note** keep fees low";
        let reply = FormattedReply::parse(raw);
        let card = reply.card.clone().unwrap();
        assert_eq!(card.title, "Here is a balanced portfolio plan");
        assert_eq!(
            card.key_points,
            ["60% equities", "30% bonds", "10% cash", "Rebalance yearly"]
        );

        let plain = reply.to_plain();
        assert!(plain.starts_with(raw));
        assert!(plain.contains("== Here is a balanced portfolio plan =="));
        assert!(plain.ends_with("  - Rebalance yearly"));
    }

    #[test]
    fn test_key_points_capped_at_five() {
        let raw = "strategy\n- a\n- b\n- c\n- d\n- e\n- f\n- g";
        let card = FormattedReply::parse(raw).card.unwrap();
        assert_eq!(card.key_points, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_sentence_fallback_and_default_title() {
        let raw = "I recommend caution. Markets are choppy. Keep risk small! Have fun.";
        let card = FormattedReply::parse(raw).card.unwrap();
        assert_eq!(card.title, DEFAULT_TITLE);
        assert_eq!(card.key_points, ["I recommend caution.", "Keep risk small!"]);
    }

    #[test]
    fn test_markup_escapes_card_fields() {
        let raw = "<b>strategy</b> for you\n- buy <AAPL> & hold";
        let markup = format(raw);
        assert!(markup.starts_with(raw));
        assert!(markup.contains("<div class=\"strategy-card\">"));
        assert!(markup.contains("<h3>&lt;b&gt;strategy&lt;/b&gt; for you</h3>"));
        assert!(markup.contains("<li>buy &lt;AAPL&gt; &amp; hold</li>"));
    }
}
