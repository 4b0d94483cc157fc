//! Shared error taxonomy and value types for the tradedesk crates.

pub mod error;
pub mod types;

pub use error::AppError;
pub use types::{ChatMode, OutputFormat, QueryFunction, TimeRange, mask_secret};
