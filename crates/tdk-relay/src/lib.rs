//! HTTP relay between the chat widget and the generative-language API.

mod classify;
pub mod config;
pub mod gemini;
mod prompt;
pub mod server;

pub use classify::user_facing_error;
pub use config::RelayConfig;
pub use gemini::{GeminiClient, ModelError, StrategyModel};
pub use prompt::build_prompt;
pub use server::{RelayEndpoint, router};
