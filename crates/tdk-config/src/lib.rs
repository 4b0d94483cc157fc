//! Configuration loading: global settings (`config.toml`), the quote API
//! credential document, and relay API key resolution.

pub mod credentials;
pub mod global;
pub mod secrets;
pub mod validate;

pub use credentials::{credentials_template, extract_credentials, load_credential_document};
pub use global::{ChatSettings, GlobalConfig, QuoteSettings, RelaySettings};
pub use secrets::resolve_api_key;
pub use validate::validate_config;
