//! Ephemeral staging store
//!
//! Holds the [`StagedWallet`] between the password step and verification. Reads
//! never fail: a missing, expired, corrupt or unreadable record is simply absent.

use std::sync::Arc;
use std::time::Duration;

use mycoin_common::database::{SessionStorage, DISPLAY_PHRASE_KEY, STAGED_WALLET_KEY};
use mycoin_common::{Mnemonic, StagedWallet};
use tracing::instrument;

use crate::Error;

/// Default lifetime of a staged wallet
pub const DEFAULT_STAGING_TTL: Duration = Duration::from_secs(30 * 60);

/// Session scoped store for the staged wallet
#[derive(Debug, Clone)]
pub struct StagingStore {
    storage: Arc<dyn SessionStorage + Send + Sync>,
    ttl: Duration,
}

impl StagingStore {
    /// Create new [`StagingStore`] with the default ttl
    pub fn new(storage: Arc<dyn SessionStorage + Send + Sync>) -> Self {
        Self {
            storage,
            ttl: DEFAULT_STAGING_TTL,
        }
    }

    /// Override the ttl
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Record lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stage a wallet, replacing any previous record
    #[instrument(skip_all)]
    pub async fn store(
        &self,
        user_id: &str,
        passphrase: &str,
        password: &str,
    ) -> Result<StagedWallet, Error> {
        let staged = StagedWallet::new(
            user_id.to_string(),
            passphrase.to_string(),
            password.to_string(),
        );

        let json = serde_json::to_string(&staged)?;
        self.storage.set(STAGED_WALLET_KEY, &json).await?;

        tracing::debug!("Staged wallet for user {}", staged.user_id);

        Ok(staged)
    }

    /// Write an existing record as is, keeping its timestamp
    pub async fn put(&self, staged: &StagedWallet) -> Result<(), Error> {
        let json = serde_json::to_string(staged)?;
        self.storage.set(STAGED_WALLET_KEY, &json).await?;
        Ok(())
    }

    /// Staged wallet, if present and younger than the ttl
    #[instrument(skip_all)]
    pub async fn retrieve(&self) -> Option<StagedWallet> {
        let json = match self.storage.get(STAGED_WALLET_KEY).await {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!("Could not read staged wallet: {}", err);
                return None;
            }
        };

        let staged: StagedWallet = match serde_json::from_str(&json) {
            Ok(staged) => staged,
            Err(err) => {
                tracing::warn!("Discarding malformed staged wallet: {}", err);
                self.clear().await;
                return None;
            }
        };

        if staged.is_expired(self.ttl) {
            tracing::debug!("Discarding expired staged wallet");
            self.clear().await;
            return None;
        }

        Some(staged)
    }

    /// Remove the staged wallet. Never fails.
    #[instrument(skip_all)]
    pub async fn clear(&self) {
        if let Err(err) = self.storage.remove(STAGED_WALLET_KEY).await {
            tracing::warn!("Could not clear staged wallet: {}", err);
        }
    }
}

/// Session scoped slot holding a phrase shown to the user, with no wallet attached
///
/// Used when a phrase is verified without creating a wallet afterwards.
#[derive(Debug, Clone)]
pub struct DisplayPhraseStore {
    storage: Arc<dyn SessionStorage + Send + Sync>,
}

impl DisplayPhraseStore {
    /// Create new [`DisplayPhraseStore`]
    pub fn new(storage: Arc<dyn SessionStorage + Send + Sync>) -> Self {
        Self { storage }
    }

    /// Keep `mnemonic` for display
    pub async fn put(&self, mnemonic: &Mnemonic) -> Result<(), Error> {
        let json = serde_json::to_string(mnemonic.words())?;
        self.storage.set(DISPLAY_PHRASE_KEY, &json).await?;
        Ok(())
    }

    /// Phrase kept for display, if any
    pub async fn get(&self) -> Option<Mnemonic> {
        let json = match self.storage.get(DISPLAY_PHRASE_KEY).await {
            Ok(json) => json?,
            Err(err) => {
                tracing::warn!("Could not read display phrase: {}", err);
                return None;
            }
        };

        let words: Vec<String> = serde_json::from_str(&json).ok()?;
        Mnemonic::from_words(words).ok()
    }

    /// Remove the phrase. Never fails.
    pub async fn clear(&self) {
        if let Err(err) = self.storage.remove(DISPLAY_PHRASE_KEY).await {
            tracing::warn!("Could not clear display phrase: {}", err);
        }
    }
}
