//! Global configuration for tradedesk (`~/.config/tradedesk/config.toml`).
//!
//! Holds user-level settings for the three surfaces:
//! - `[quotes]`: quote API endpoint and the credential document location
//! - `[chat]`: chat relay endpoint, wait bound and failover threshold
//! - `[relay]`: bind address and generative-language model settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::validate::validate_config;

/// XDG app name used for config paths.
pub const APP_NAME: &str = "tradedesk";

const DEFAULT_QUOTE_BASE_URL: &str = "https://www.alphavantage.co";
const DEFAULT_CREDENTIALS_PATH: &str = "keys.json";
const DEFAULT_QUOTE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CHAT_ENDPOINT: &str = "http://127.0.0.1:3000/api/gemini";
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_FAILURE_THRESHOLD: u32 = 2;
const DEFAULT_RELAY_BIND: &str = "127.0.0.1";
const DEFAULT_RELAY_PORT: u16 = 3000;
const DEFAULT_RELAY_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_RELAY_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;
const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
const DEFAULT_ENV_FILE: &str = ".env";
const DEFAULT_RELAY_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Global configuration loaded from `~/.config/tradedesk/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub quotes: QuoteSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub relay: RelaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSettings {
    #[serde(default = "default_quote_base_url")]
    pub base_url: String,
    /// Credential document (JSON). Relative paths resolve against the CWD.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
    /// Bound on one quote API request, body included.
    #[serde(default = "default_quote_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            base_url: default_quote_base_url(),
            credentials_path: default_credentials_path(),
            timeout_secs: DEFAULT_QUOTE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    /// Bounded wait for one chat call.
    #[serde(default = "default_chat_timeout_secs")]
    pub timeout_secs: u64,
    /// Consecutive failures before the session falls back to demo mode.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            timeout_secs: DEFAULT_CHAT_TIMEOUT_SECS,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySettings {
    #[serde(default = "default_relay_bind")]
    pub bind: String,
    #[serde(default = "default_relay_port")]
    pub port: u16,
    #[serde(default = "default_relay_model")]
    pub model: String,
    #[serde(default = "default_relay_api_base")]
    pub api_base: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Environment variable holding the model API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Fallback `KEY=value` file consulted when the variable is unset.
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
    #[serde(default = "default_relay_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            bind: default_relay_bind(),
            port: DEFAULT_RELAY_PORT,
            model: default_relay_model(),
            api_base: default_relay_api_base(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            api_key_env: default_api_key_env(),
            env_file: default_env_file(),
            request_timeout_secs: DEFAULT_RELAY_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn default_quote_base_url() -> String {
    DEFAULT_QUOTE_BASE_URL.to_string()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from(DEFAULT_CREDENTIALS_PATH)
}

fn default_quote_timeout_secs() -> u64 {
    DEFAULT_QUOTE_TIMEOUT_SECS
}

fn default_chat_endpoint() -> String {
    DEFAULT_CHAT_ENDPOINT.to_string()
}

fn default_chat_timeout_secs() -> u64 {
    DEFAULT_CHAT_TIMEOUT_SECS
}

fn default_failure_threshold() -> u32 {
    DEFAULT_FAILURE_THRESHOLD
}

fn default_relay_bind() -> String {
    DEFAULT_RELAY_BIND.to_string()
}

fn default_relay_port() -> u16 {
    DEFAULT_RELAY_PORT
}

fn default_relay_model() -> String {
    DEFAULT_RELAY_MODEL.to_string()
}

fn default_relay_api_base() -> String {
    DEFAULT_RELAY_API_BASE.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_env_file() -> PathBuf {
    PathBuf::from(DEFAULT_ENV_FILE)
}

fn default_relay_request_timeout_secs() -> u64 {
    DEFAULT_RELAY_REQUEST_TIMEOUT_SECS
}

impl GlobalConfig {
    /// Load global config from `~/.config/tradedesk/config.toml`.
    ///
    /// Returns `Default` if the file does not exist or if the config
    /// directory cannot be determined (e.g., no HOME in containers).
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(Self::default()),
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No global config, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    /// [`GlobalConfig::load`] followed by [`validate_config`], for commands
    /// that act on the settings.
    pub fn load_validated() -> Result<Self> {
        let config = Self::load()?;
        validate_config(&config).context("Invalid global config")?;
        Ok(config)
    }

    /// [`GlobalConfig::load_from_path`] followed by [`validate_config`].
    pub fn load_validated_from_path(path: &Path) -> Result<Self> {
        let config = Self::load_from_path(path)?;
        validate_config(&config)
            .with_context(|| format!("Invalid global config: {}", path.display()))?;
        Ok(config)
    }

    /// Load from an explicit path. Unlike [`GlobalConfig::load`], a missing
    /// file is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read global config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse global config: {}", path.display()))?;
        Ok(config)
    }

    /// Path to the global config file: `~/.config/tradedesk/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", APP_NAME)
            .context("Failed to determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Generate default config TOML with comments as a template.
    pub fn default_template() -> String {
        r#"# tradedesk global configuration
# Location: ~/.config/tradedesk/config.toml

[quotes]
base_url = "https://www.alphavantage.co"
# JSON document: { "keys": ["KEY_1", "KEY_2"] }
credentials_path = "keys.json"
timeout_secs = 30       # Bound on one quote API request

[chat]
endpoint = "http://127.0.0.1:3000/api/gemini"
timeout_secs = 15       # Bounded wait for one chat call
failure_threshold = 2   # Consecutive failures before demo mode

[relay]
bind = "127.0.0.1"
port = 3000
model = "gemini-2.0-flash"
api_base = "https://generativelanguage.googleapis.com"
temperature = 0.7
max_output_tokens = 2048
api_key_env = "GEMINI_API_KEY"   # Read first from the environment
env_file = ".env"                # then from a KEY=value line in this file
request_timeout_secs = 60
"#
        .to_string()
    }

    pub fn save_default_template_to(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, Self::default_template())
            .with_context(|| format!("Failed to write global config: {}", path.display()))?;
        Ok(())
    }
}
