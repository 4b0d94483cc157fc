#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Configuration required: {0}")]
    ConfigError(String),

    #[error("Credential pool used before initialization")]
    NotInitialized,

    #[error("Symbol must not be empty")]
    EmptySymbol,

    #[error("API request failed: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid API key")]
    InvalidCredential,

    #[error(
        "No data found for symbol \"{0}\". Please check the stock symbol and try again."
    )]
    SymbolNotFound(String),

    #[error("Upstream did not answer within {secs}s")]
    Timeout { secs: u64 },

    #[error("Unrecognized {function} payload: {detail}")]
    UnrecognizedShape { function: String, detail: String },
}

impl AppError {
    /// Whether the caller can keep going after this error.
    ///
    /// Configuration and sequencing errors block all further use; every
    /// upstream failure is recoverable by the next user action.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigError(_) | Self::NotInitialized)
    }
}
