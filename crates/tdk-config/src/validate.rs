use anyhow::{Result, bail};

use crate::global::GlobalConfig;

/// Validate a loaded global configuration.
/// Returns Ok(()) if valid, or Err with a descriptive message.
pub fn validate_config(config: &GlobalConfig) -> Result<()> {
    validate_quotes(config)?;
    validate_chat(config)?;
    validate_relay(config)?;
    Ok(())
}

fn validate_quotes(config: &GlobalConfig) -> Result<()> {
    require_http_url("quotes.base_url", &config.quotes.base_url)?;
    if config.quotes.credentials_path.as_os_str().is_empty() {
        bail!("quotes.credentials_path cannot be empty");
    }
    if config.quotes.timeout_secs == 0 {
        bail!("quotes.timeout_secs must be > 0 (got 0)");
    }
    Ok(())
}

fn validate_chat(config: &GlobalConfig) -> Result<()> {
    require_http_url("chat.endpoint", &config.chat.endpoint)?;
    if config.chat.timeout_secs == 0 {
        bail!("chat.timeout_secs must be > 0 (got 0)");
    }
    if config.chat.failure_threshold == 0 {
        bail!(
            "chat.failure_threshold must be >= 1 (got 0). \
             A zero threshold would start every session in demo mode."
        );
    }
    Ok(())
}

fn validate_relay(config: &GlobalConfig) -> Result<()> {
    let relay = &config.relay;
    if relay.bind.trim().is_empty() {
        bail!("relay.bind cannot be empty");
    }
    if relay.model.trim().is_empty() {
        bail!("relay.model cannot be empty");
    }
    require_http_url("relay.api_base", &relay.api_base)?;
    if !(0.0..=2.0).contains(&relay.temperature) {
        bail!(
            "relay.temperature must be within 0.0..=2.0 (got {})",
            relay.temperature
        );
    }
    if relay.max_output_tokens == 0 {
        bail!("relay.max_output_tokens must be > 0 (got 0)");
    }
    if relay.api_key_env.trim().is_empty() {
        bail!("relay.api_key_env cannot be empty");
    }
    if relay.request_timeout_secs == 0 {
        bail!("relay.request_timeout_secs must be > 0 (got 0)");
    }
    Ok(())
}

fn require_http_url(field: &str, value: &str) -> Result<()> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        bail!("{field} must be an http(s) URL (got '{value}')");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        validate_config(&GlobalConfig::default()).unwrap();
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut config = GlobalConfig::default();
        config.chat.failure_threshold = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("failure_threshold"));
    }

    #[test]
    fn test_zero_chat_timeout_rejected() {
        let mut config = GlobalConfig::default();
        config.chat.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_quote_timeout_rejected() {
        let mut config = GlobalConfig::default();
        config.quotes.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("quotes.timeout_secs"));
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut config = GlobalConfig::default();
        config.chat.endpoint = "ftp://example.com/api".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("chat.endpoint"));
    }

    #[test]
    fn test_temperature_out_of_range_rejected() {
        let mut config = GlobalConfig::default();
        config.relay.temperature = 3.5;
        assert!(validate_config(&config).is_err());
    }
}
