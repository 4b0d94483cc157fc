//! Quote API credential document (`keys.json`).
//!
//! The document is a JSON object with a `keys` list and/or one of the
//! singular fields `ALPHA_VANTAGE_API_KEY` / `alpha_vantage_api_key`.
//! Only shape is validated here; whether a key is accepted upstream is
//! discovered per call.

use std::path::Path;

use serde_json::Value;
use tdk_core::AppError;

/// Length of a well-formed quote API key.
pub const CREDENTIAL_LEN: usize = 16;

const SINGULAR_FIELDS: [&str; 2] = ["ALPHA_VANTAGE_API_KEY", "alpha_vantage_api_key"];

/// Collect every credential-looking string from the document, in order:
/// `keys[*]` first, then the singular fields.
///
/// Non-string values and strings of the wrong length are skipped.
pub fn extract_credentials(document: &Value) -> Vec<String> {
    let listed = document
        .get("keys")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();
    let singular = SINGULAR_FIELDS
        .iter()
        .filter_map(|field| document.get(*field));

    listed
        .chain(singular)
        .filter_map(Value::as_str)
        .filter(|candidate| candidate.chars().count() == CREDENTIAL_LEN)
        .map(str::to_string)
        .collect()
}

/// Read and parse the credential document.
///
/// Any failure here is a configuration problem the user must fix.
pub fn load_credential_document(path: &Path) -> Result<Value, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::ConfigError(format!(
            "cannot read credential file {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        AppError::ConfigError(format!(
            "credential file {} is not valid JSON: {e}",
            path.display()
        ))
    })
}

/// Example document shown when no usable credential is configured.
pub fn credentials_template() -> &'static str {
    r#"{
  "keys": [
    "YOUR_API_KEY_1",
    "YOUR_API_KEY_2"
  ]
}"#
}
