//! Map model failures to the text shown in the chat widget.

const GENERIC: &str = "Sorry, I encountered an error generating your strategy. Please try again.";

/// Substring rules, checked in order.
const RULES: [(&str, &str); 4] = [
    (
        "API key",
        "API key error: The server is not properly configured to use the Gemini API.",
    ),
    (
        "PERMISSION_DENIED",
        "Access denied: The API key doesn't have permission to use the Gemini API.",
    ),
    (
        "RESOURCE_EXHAUSTED",
        "API quota exceeded: The server has reached its limit for API requests.",
    ),
    (
        "network",
        "Network error: Could not connect to the Gemini API.",
    ),
];

pub fn user_facing_error(detail: &str) -> &'static str {
    RULES
        .iter()
        .find(|(needle, _)| detail.contains(needle))
        .map_or(GENERIC, |(_, text)| text)
}
