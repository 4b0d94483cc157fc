//! Model API key resolution for the relay.

use std::path::Path;

use regex::Regex;
use tdk_core::mask_secret;
use tracing::{debug, info};

/// Resolve the API key: environment variable first, then a `NAME=value`
/// line in `env_file`. Returns `None` when neither yields a value.
pub fn resolve_api_key(var_name: &str, env_file: &Path) -> Option<String> {
    resolve_api_key_from(std::env::var(var_name).ok(), var_name, env_file)
}

fn resolve_api_key_from(
    env_value: Option<String>,
    var_name: &str,
    env_file: &Path,
) -> Option<String> {
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        debug!(var = var_name, key = %mask_secret(&value), "API key from environment");
        return Some(value);
    }

    let content = std::fs::read_to_string(env_file).ok()?;
    let key = parse_env_line(&content, var_name)?;
    info!(
        var = var_name,
        file = %env_file.display(),
        key = %mask_secret(&key),
        "API key loaded from env file"
    );
    Some(key)
}

/// Find `NAME=value` in dotenv-style content. The value stops at the first
/// whitespace or quote character.
fn parse_env_line(content: &str, var_name: &str) -> Option<String> {
    let pattern = format!(r#"(?m)^\s*{}=([^\s"']+)"#, regex::escape(var_name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
