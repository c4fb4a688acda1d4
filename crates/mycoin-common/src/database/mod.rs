//! MyCoin Database
//!
//! The onboarding flow only needs a tiny key-value text store: one slot scoped to the
//! current session for the staged wallet, and one persistent slot for the finalized
//! wallet mirror. Both are expressed through [`SessionStorage`].

use async_trait::async_trait;

/// Storage key holding the staged wallet during creation
pub const STAGED_WALLET_KEY: &str = "temp_wallet_data";

/// Storage key holding a phrase kept for display only, as a JSON array of words
pub const DISPLAY_PHRASE_KEY: &str = "recoveryPhrase";

/// Storage key holding the finalized wallet mirror
pub const WALLET_KEY: &str = "wallet";

/// MyCoin database error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database Error
    #[error(transparent)]
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// Storage medium is not available in this context
    #[error("Storage unavailable")]
    Unavailable,
    /// Invalid key
    #[error("Invalid storage key: `{0}`")]
    InvalidKey(String),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Maximum length for storage keys
pub const STORAGE_KEY_MAX_LEN: usize = 120;

/// Validates that a key contains only ASCII letters, numbers, underscore and hyphen
pub fn validate_storage_key(key: &str) -> Result<(), Error> {
    if key.is_empty() || key.len() > STORAGE_KEY_MAX_LEN {
        return Err(Error::InvalidKey(format!(
            "key must be between 1 and {STORAGE_KEY_MAX_LEN} characters"
        )));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::InvalidKey(key.to_string()));
    }

    Ok(())
}

/// Key-value text store
///
/// Mirrors a browser storage area: values are opaque string blobs addressed by a
/// fixed key. Implementations decide the scope (session or persistent).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SessionStorage: std::fmt::Debug {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), Error>;
}
