use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tdk_config::{GlobalConfig, resolve_api_key};

/// Effective relay settings: `[relay]` from the global config plus CLI
/// overrides and the resolved model API key.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: String,
    pub port: u16,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl RelayConfig {
    pub fn load(bind_override: Option<String>, port_override: Option<u16>) -> Result<Self> {
        let global = GlobalConfig::load_validated()?;
        let mut cfg = Self::from_global_config(&global, bind_override, port_override);
        cfg.api_key = resolve_api_key(&global.relay.api_key_env, &global.relay.env_file);
        Ok(cfg)
    }

    /// Build from an already loaded config. The API key is left unresolved.
    pub fn from_global_config(
        global: &GlobalConfig,
        bind_override: Option<String>,
        port_override: Option<u16>,
    ) -> Self {
        let relay = &global.relay;
        Self {
            bind: bind_override.unwrap_or_else(|| relay.bind.clone()),
            port: port_override.unwrap_or(relay.port),
            model: relay.model.clone(),
            api_base: relay.api_base.trim_end_matches('/').to_string(),
            temperature: relay.temperature,
            max_output_tokens: relay.max_output_tokens,
            api_key_env: relay.api_key_env.clone(),
            api_key: None,
            request_timeout_secs: relay.request_timeout_secs,
        }
    }

    /// Resolve `bind:port` to a socket address. `bind` may be an IP literal
    /// or a hostname such as `localhost`; the first resolved address wins.
    pub async fn resolve_bind_addr(&self) -> Result<SocketAddr> {
        let target = (self.bind.as_str(), self.port);
        tokio::net::lookup_host(target)
            .await
            .with_context(|| format!("invalid relay bind address '{}:{}'", self.bind, self.port))?
            .next()
            .ok_or_else(|| {
                anyhow!("relay bind address '{}:{}' resolved to nothing", self.bind, self.port)
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_from_global_config() {
        let cfg = RelayConfig::from_global_config(&GlobalConfig::default(), None, None);
        assert_eq!(cfg.bind, "127.0.0.1");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.model, "gemini-2.0-flash");
        assert_eq!(cfg.max_output_tokens, 2048);
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.resolve_bind_addr().await.unwrap().port(), 3000);
    }

    #[tokio::test]
    async fn test_overrides_win() {
        let cfg = RelayConfig::from_global_config(
            &GlobalConfig::default(),
            Some("0.0.0.0".to_string()),
            Some(0),
        );
        assert_eq!(
            cfg.resolve_bind_addr().await.unwrap().to_string(),
            "0.0.0.0:0"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed_from_api_base() {
        let mut global = GlobalConfig::default();
        global.relay.api_base = "http://localhost:8080/".to_string();
        let cfg = RelayConfig::from_global_config(&global, None, None);
        assert_eq!(cfg.api_base, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_hostname_bind_resolves() {
        let cfg = RelayConfig::from_global_config(
            &GlobalConfig::default(),
            Some("localhost".to_string()),
            Some(0),
        );
        let addr = cfg.resolve_bind_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_invalid_bind_is_error() {
        let cfg = RelayConfig::from_global_config(
            &GlobalConfig::default(),
            Some("not an address".to_string()),
            None,
        );
        let err = cfg.resolve_bind_addr().await.unwrap_err();
        assert!(err.to_string().contains("invalid relay bind address"));
    }
}
