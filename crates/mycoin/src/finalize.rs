//! Finalization bridge
//!
//! Turns a verified [`StagedWallet`] into a backend wallet. The staged record is
//! cleared only after the backend confirmed creation, and at most one creation
//! runs at a time per [`Finalizer`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mycoin_common::wallet::Wallet;
use mycoin_common::StagedWallet;
use tracing::instrument;

use crate::session::WalletSession;
use crate::staging::StagingStore;
use crate::Error;

/// Resets the in-flight flag when dropped
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, Error> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::FinalizeInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Finalization bridge
#[derive(Debug)]
pub struct Finalizer {
    session: Arc<WalletSession>,
    staging: StagingStore,
    in_flight: AtomicBool,
}

impl Finalizer {
    /// Create new [`Finalizer`]
    pub fn new(session: Arc<WalletSession>, staging: StagingStore) -> Self {
        Self {
            session,
            staging,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Wallet session receiving the created wallet
    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    /// Whether a creation is running
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Create the wallet for `staged`
    ///
    /// Success clears the staging store. Failure leaves it untouched so the call
    /// can be retried with the same record.
    #[instrument(skip_all)]
    pub async fn finalize(&self, staged: &StagedWallet) -> Result<Wallet, Error> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        tracing::debug!("Creating wallet for user {}", staged.user_id);

        match self
            .session
            .create_wallet(&staged.user_id, &staged.passphrase)
            .await
        {
            Ok(wallet) => {
                self.staging.clear().await;
                tracing::info!("Wallet finalized for user {}", staged.user_id);
                Ok(wallet)
            }
            Err(err) => {
                tracing::warn!("Wallet creation failed, staged wallet kept: {}", err);
                Err(err)
            }
        }
    }
}
