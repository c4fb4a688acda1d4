//! Wallet session
//!
//! Explicitly constructed state holder for the dashboard, explorer and mining
//! views. The loaded wallet is mirrored to persistent storage under
//! [`WALLET_KEY`] so the next session can restore it.
//!
//! Every fallible operation records [`Error::user_message`] in the session
//! `error` slot in addition to returning the error.

use std::sync::Arc;

use mycoin_common::database::{SessionStorage, WALLET_KEY};
use mycoin_common::wallet::{
    Block, BlockchainTransactions, MiningStatus, PaginationInfo, Transaction, Wallet, WalletStats,
};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::connector::{SendCoinsRequest, WalletConnector};
use crate::Error;

/// Default explorer page
pub const DEFAULT_PAGE: u32 = 1;

/// Default explorer page size
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Snapshot of the session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Loaded wallet
    pub wallet: Option<Wallet>,
    /// Stats of the loaded wallet
    pub wallet_stats: Option<WalletStats>,
    /// History of the loaded wallet
    pub transactions: Vec<Transaction>,
    /// Last loaded explorer page
    pub blockchain_transactions: Vec<Transaction>,
    /// Pagination of the explorer page
    pub pagination: Option<PaginationInfo>,
    /// Last known mining status
    pub mining_status: Option<MiningStatus>,
    /// An operation is running
    pub is_loading: bool,
    /// Message of the last failure
    pub error: Option<String>,
}

/// Wallet session
#[derive(Debug)]
pub struct WalletSession {
    connector: Arc<dyn WalletConnector + Send + Sync>,
    storage: Arc<dyn SessionStorage + Send + Sync>,
    state: RwLock<SessionState>,
}

impl WalletSession {
    /// Create new [`WalletSession`]
    ///
    /// `storage` is the persistent store holding the wallet mirror.
    pub fn new(
        connector: Arc<dyn WalletConnector + Send + Sync>,
        storage: Arc<dyn SessionStorage + Send + Sync>,
    ) -> Self {
        Self {
            connector,
            storage,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Backend connector
    pub fn connector(&self) -> Arc<dyn WalletConnector + Send + Sync> {
        self.connector.clone()
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Loaded wallet
    pub async fn wallet(&self) -> Option<Wallet> {
        self.state.read().await.wallet.clone()
    }

    /// Stats of the loaded wallet
    pub async fn wallet_stats(&self) -> Option<WalletStats> {
        self.state.read().await.wallet_stats.clone()
    }

    /// History of the loaded wallet
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.read().await.transactions.clone()
    }

    /// Message of the last failure
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    async fn address(&self) -> Option<String> {
        self.state
            .read()
            .await
            .wallet
            .as_ref()
            .map(|w| w.address.clone())
            .filter(|a| !a.is_empty())
    }

    async fn begin(&self) {
        let mut state = self.state.write().await;
        state.is_loading = true;
        state.error = None;
    }

    async fn finish<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        let mut state = self.state.write().await;
        state.is_loading = false;
        if let Err(err) = &result {
            state.error = Some(err.user_message());
        }
        result
    }

    async fn record_error(&self, err: &Error) {
        self.state.write().await.error = Some(err.user_message());
    }

    async fn persist(&self, wallet: &Wallet) {
        let json = match serde_json::to_string(wallet) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("Could not serialize wallet: {}", err);
                return;
            }
        };

        if let Err(err) = self.storage.set(WALLET_KEY, &json).await {
            tracing::warn!("Could not persist wallet: {}", err);
        }
    }

    /// Restore the persisted wallet and fetch its data
    ///
    /// An unreadable mirror is removed. Mining status is fetched regardless and
    /// its failure is ignored.
    #[instrument(skip_all)]
    pub async fn init(&self) -> Option<Wallet> {
        let stored = match self.storage.get(WALLET_KEY).await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!("Could not read stored wallet: {}", err);
                None
            }
        };

        let wallet = match stored {
            Some(json) => match serde_json::from_str::<Wallet>(&json) {
                Ok(wallet) if !wallet.address.is_empty() => Some(wallet),
                Ok(_) | Err(_) => {
                    tracing::warn!("Removing invalid stored wallet");
                    if let Err(err) = self.storage.remove(WALLET_KEY).await {
                        tracing::warn!("Could not remove stored wallet: {}", err);
                    }
                    None
                }
            },
            None => None,
        };

        if let Some(wallet) = &wallet {
            self.state.write().await.wallet = Some(wallet.clone());
            self.load_stats(&wallet.address).await;
            self.load_history(&wallet.address).await;
        }

        match self.connector.get_mining_status().await {
            Ok(status) => self.state.write().await.mining_status = Some(status),
            Err(err) => tracing::debug!("Mining status not available: {}", err),
        }

        wallet
    }

    async fn load_stats(&self, address: &str) {
        match self.connector.get_wallet_stats(address).await {
            Ok(stats) => self.state.write().await.wallet_stats = Some(stats),
            Err(err) => {
                tracing::error!("Failed to load wallet stats: {}", err);
                self.record_error(&err.into()).await;
            }
        }
    }

    async fn load_history(&self, address: &str) {
        match self.connector.get_transaction_history(address).await {
            Ok(history) => self.state.write().await.transactions = history,
            Err(err) if err.status() == Some(404) => {
                self.state.write().await.transactions = Vec::new();
            }
            Err(err) => {
                tracing::error!("Failed to load transaction history: {}", err);
                self.record_error(&err.into()).await;
            }
        }
    }

    /// Create a wallet on the backend and make it the loaded wallet
    #[instrument(skip_all)]
    pub async fn create_wallet(&self, user_id: &str, passphrase: &str) -> Result<Wallet, Error> {
        self.begin().await;

        let result = match self.connector.create_wallet(user_id, passphrase).await {
            Ok(wallet) => {
                {
                    let mut state = self.state.write().await;
                    state.wallet_stats = Some(WalletStats::from(&wallet));
                    state.wallet = Some(wallet.clone());
                }

                if wallet.passphrase.is_some() {
                    tracing::info!("Backend generated a recovery passphrase for the wallet");
                }

                self.persist(&wallet).await;
                tracing::info!("Created wallet {}", wallet.address);
                Ok(wallet)
            }
            Err(err) => {
                tracing::error!("Failed to create wallet: {}", err);
                Err(err.into())
            }
        };

        self.finish(result).await
    }

    /// Load a wallet by address, without its private key
    #[instrument(skip(self))]
    pub async fn load_wallet(&self, address: &str) -> Result<(), Error> {
        self.begin().await;

        self.load_stats(address).await;
        self.load_history(address).await;
        self.state.write().await.wallet = Some(Wallet {
            address: address.to_string(),
            user_id: "unknown".to_string(),
            ..Default::default()
        });

        self.finish(Ok(())).await
    }

    /// Load a wallet including its private key and persist it
    #[instrument(skip(self))]
    pub async fn load_wallet_with_private_key(&self, address: &str) -> Result<Wallet, Error> {
        self.begin().await;

        let result = match self.connector.get_wallet_with_private_key(address).await {
            Ok(wallet) => {
                self.state.write().await.wallet = Some(wallet.clone());
                self.load_stats(address).await;
                self.load_history(address).await;
                self.persist(&wallet).await;
                Ok(wallet)
            }
            Err(err) => Err(err.into()),
        };

        self.finish(result).await
    }

    /// Reload stats of the loaded wallet. No-op without a wallet.
    pub async fn refresh_wallet_stats(&self) {
        if let Some(address) = self.address().await {
            self.load_stats(&address).await;
        }
    }

    /// Reload history of the loaded wallet. No-op without a wallet.
    pub async fn load_transaction_history(&self) {
        if let Some(address) = self.address().await {
            self.load_history(&address).await;
        }
    }

    /// Send coins from the loaded wallet
    ///
    /// Requires a wallet loaded with its private key. Stats and history are
    /// refreshed on success.
    #[instrument(skip(self))]
    pub async fn send_coins(
        &self,
        to_address: &str,
        amount: f64,
    ) -> Result<serde_json::Value, Error> {
        let sender = self
            .wallet()
            .await
            .filter(|w| !w.address.is_empty())
            .and_then(|w| w.private_key.clone().map(|key| (w.address.clone(), key)));

        let Some((from_address, private_key)) = sender else {
            let err = Error::PrivateKeyMissing;
            self.record_error(&err).await;
            return Err(err);
        };

        self.begin().await;

        let request = SendCoinsRequest {
            from_address,
            to_address: to_address.to_string(),
            amount,
            private_key,
        };

        let result = match self.connector.send_coins(request).await {
            Ok(response) => {
                tracing::info!("Sent {} to {}", amount, to_address);
                self.refresh_wallet_stats().await;
                self.load_transaction_history().await;
                Ok(response)
            }
            Err(err) => {
                tracing::error!("Transaction failed: {}", err);
                Err(err.into())
            }
        };

        self.finish(result).await
    }

    /// Forget the loaded wallet and its persisted mirror
    #[instrument(skip_all)]
    pub async fn clear_wallet(&self) {
        {
            let mut state = self.state.write().await;
            state.wallet = None;
            state.wallet_stats = None;
            state.transactions.clear();
        }

        if let Err(err) = self.storage.remove(WALLET_KEY).await {
            tracing::warn!("Could not remove stored wallet: {}", err);
        }
    }

    /// Load a page of all chain transactions
    #[instrument(skip(self))]
    pub async fn load_blockchain_transactions(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<BlockchainTransactions, Error> {
        self.begin().await;

        let result = match self.connector.get_blockchain_transactions(page, limit).await {
            Ok(response) => {
                tracing::debug!(
                    "Loaded {} blockchain transactions",
                    response.transactions.len()
                );
                let mut state = self.state.write().await;
                state.blockchain_transactions = response.transactions.clone();
                state.pagination = Some(response.pagination);
                Ok(response)
            }
            Err(err) => Err(err.into()),
        };

        self.finish(result).await
    }

    async fn fetch_mining_status(&self) -> Result<MiningStatus, Error> {
        let status = self.connector.get_mining_status().await?;
        self.state.write().await.mining_status = Some(status.clone());
        Ok(status)
    }

    /// Fetch mining status
    #[instrument(skip_all)]
    pub async fn get_mining_status(&self) -> Result<MiningStatus, Error> {
        self.begin().await;
        let result = self.fetch_mining_status().await;
        self.finish(result).await
    }

    /// Set the mining reward address, then refresh the status
    #[instrument(skip(self))]
    pub async fn set_mining_address(&self, address: &str) -> Result<MiningStatus, Error> {
        self.begin().await;

        let result = match self.connector.set_mining_address(address).await {
            Ok(_) => self.fetch_mining_status().await,
            Err(err) => Err(err.into()),
        };

        self.finish(result).await
    }

    /// Set the mining difficulty, then refresh the status
    #[instrument(skip(self))]
    pub async fn set_mining_difficulty(&self, difficulty: u32) -> Result<MiningStatus, Error> {
        self.begin().await;

        let result = match self.connector.set_mining_difficulty(difficulty).await {
            Ok(_) => self.fetch_mining_status().await,
            Err(err) => Err(err.into()),
        };

        self.finish(result).await
    }

    /// Start mining, then refresh the status
    #[instrument(skip_all)]
    pub async fn start_mining(&self) -> Result<MiningStatus, Error> {
        self.begin().await;

        let result = match self.connector.start_mining().await {
            Ok(_) => self.fetch_mining_status().await,
            Err(err) => Err(err.into()),
        };

        self.finish(result).await
    }

    /// Stop mining, then refresh the status
    #[instrument(skip_all)]
    pub async fn stop_mining(&self) -> Result<MiningStatus, Error> {
        self.begin().await;

        let result = match self.connector.stop_mining().await {
            Ok(_) => self.fetch_mining_status().await,
            Err(err) => Err(err.into()),
        };

        self.finish(result).await
    }

    /// Mine a block paying `miner_address`, or the loaded wallet
    #[instrument(skip(self))]
    pub async fn mine_block(&self, miner_address: Option<&str>) -> Result<Block, Error> {
        self.begin().await;

        let loaded = self.address().await;
        let address = miner_address
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .or_else(|| loaded.clone());

        let result = match address {
            None => Err(Error::NoMiningAddress),
            Some(address) => match self.connector.mine_block(&address).await {
                Ok(block) => {
                    tracing::info!("Mined block {}", block.index);
                    if let Some(loaded) = &loaded {
                        self.load_stats(loaded).await;
                        self.load_history(loaded).await;
                    }
                    Ok(block)
                }
                Err(err) => Err(err.into()),
            },
        };

        self.finish(result).await
    }
}
