//! Staged wallet
//!
//! Sensitive setup data held between the password step and phrase verification,
//! before the wallet is created on the backend.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::Error;
use crate::mnemonic::Mnemonic;
use crate::util::unix_time_ms;

/// Staged wallet record
///
/// Serialized with the same field names the browser session storage used
/// (`userId`, `passphrase`, `password`, `timestamp`). The timestamp is in unix
/// milliseconds. The passphrase and password are wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedWallet {
    /// Opaque user identifier
    pub user_id: String,
    /// Space-joined recovery phrase
    pub passphrase: String,
    /// Plaintext password chosen on the setup step
    pub password: String,
    /// Creation time (unix milliseconds)
    pub timestamp: u64,
}

impl StagedWallet {
    /// Create new [`StagedWallet`] stamped with the current time
    pub fn new(user_id: String, passphrase: String, password: String) -> Self {
        Self {
            user_id,
            passphrase,
            password,
            timestamp: unix_time_ms(),
        }
    }

    /// Parsed recovery phrase
    pub fn mnemonic(&self) -> Result<Mnemonic, Error> {
        Mnemonic::from_str(&self.passphrase)
    }

    /// Whether the record is at least `ttl` old at `now_ms`
    pub fn is_expired_at(&self, now_ms: u64, ttl: Duration) -> bool {
        now_ms.saturating_sub(self.timestamp) >= ttl.as_millis() as u64
    }

    /// Whether the record is at least `ttl` old
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(unix_time_ms(), ttl)
    }
}

impl fmt::Debug for StagedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedWallet")
            .field("user_id", &self.user_id)
            .field("passphrase", &"<redacted>")
            .field("password", &"<redacted>")
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl Drop for StagedWallet {
    fn drop(&mut self) {
        self.passphrase.zeroize();
        self.password.zeroize();
    }
}
