//! Round-robin rotation over the quote API credential pool.
//!
//! One credential is issued per outbound call. The pool has no health
//! tracking: a key the upstream rejects keeps coming around and each call
//! that draws it fails with `InvalidCredential`.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tdk_config::{extract_credentials, load_credential_document};
use tdk_core::{AppError, mask_secret};
use tracing::{debug, info};

/// Ordered, non-empty set of credentials plus the rotation cursor.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: Vec<String>,
    /// Always a valid index into `credentials`.
    cursor: usize,
}

impl CredentialPool {
    pub fn new(credentials: Vec<String>) -> Result<Self, AppError> {
        if credentials.is_empty() {
            return Err(AppError::ConfigError("No valid API keys found".to_string()));
        }
        Ok(Self {
            credentials,
            cursor: 0,
        })
    }

    pub fn from_document(document: &Value) -> Result<Self, AppError> {
        Self::new(extract_credentials(document))
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Return the credential at the cursor, then advance the cursor.
    pub fn next_credential(&mut self) -> &str {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.credentials.len();
        &self.credentials[index]
    }
}

/// Shared handle over an optional [`CredentialPool`].
///
/// Created empty; usable once [`KeyRotationClient::initialize`] succeeds.
/// Cursor advancement is serialised, so concurrent callers never draw the
/// same slot twice within a cycle.
#[derive(Debug, Default)]
pub struct KeyRotationClient {
    pool: Mutex<Option<CredentialPool>>,
}

impl KeyRotationClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the pool from a credential document. Returns the pool size.
    ///
    /// On failure any previously installed pool is left untouched.
    pub fn initialize(&self, document: &Value) -> Result<usize, AppError> {
        let pool = CredentialPool::from_document(document)?;
        let size = pool.len();
        *self.pool.lock().unwrap_or_else(PoisonError::into_inner) = Some(pool);
        info!(credentials = size, "Credential pool initialized");
        Ok(size)
    }

    pub fn initialize_from_path(&self, path: &Path) -> Result<usize, AppError> {
        let document = load_credential_document(path)?;
        self.initialize(&document)
    }

    pub fn is_initialized(&self) -> bool {
        self.pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn next_credential(&self) -> Result<String, AppError> {
        let mut guard = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        let pool = guard.as_mut().ok_or(AppError::NotInitialized)?;
        let index = pool.cursor();
        let credential = pool.next_credential().to_string();
        debug!(
            index,
            key = %mask_secret(&credential),
            "Round-robin selected credential"
        );
        Ok(credential)
    }
}
