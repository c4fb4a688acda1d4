//! Wallet backend connector

use std::fmt::Debug;

use async_trait::async_trait;
use mycoin_common::wallet::{
    Block, BlockchainTransactions, MiningStatus, Transaction, Wallet, WalletStats,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "http")]
pub mod http_client;

#[cfg(feature = "http")]
pub use http_client::HttpClient;

/// Default backend URL
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";

/// Connector Error
#[derive(Debug, Error)]
pub enum Error {
    /// Transport error
    #[error("HTTP error ({0:?}): {1}")]
    HttpError(Option<u16>, String),
    /// Backend answered with a non success status
    #[error("Failed to {action}: {message}")]
    Status {
        /// What was being attempted
        action: &'static str,
        /// HTTP status code
        status: u16,
        /// Message from the response body, or the status reason
        message: String,
    },
    /// Mining endpoints are not served by the backend
    #[error("Mining API not available - this feature may not be implemented yet")]
    MiningUnavailable,
    /// Url Error
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// Custom Error
    #[error("`{0}`")]
    Custom(String),
}

impl Error {
    /// HTTP status, when the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpError(status, _) => *status,
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short message safe to show to the user
    pub fn user_message(&self) -> String {
        match self {
            Error::HttpError(..) => {
                "Could not reach the wallet server. Please try again.".to_string()
            }
            Error::Status { .. } | Error::MiningUnavailable => self.to_string(),
            Error::Url(_) => "Invalid wallet server URL".to_string(),
            Error::Serde(_) => "Unexpected response from the wallet server".to_string(),
            Error::Custom(msg) => msg.clone(),
        }
    }
}

/// Create wallet request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    /// Owner id
    pub user_id: String,
    /// Recovery phrase to create the wallet from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

/// Send coins request
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinsRequest {
    /// Sender
    pub from_address: String,
    /// Recipient
    pub to_address: String,
    /// Amount
    pub amount: f64,
    /// Sender private key
    pub private_key: String,
}

impl Debug for SendCoinsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendCoinsRequest")
            .field("from_address", &self.from_address)
            .field("to_address", &self.to_address)
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

/// Interface that connects the wallet session to the MyCoin backend.
/// Typically represents an [`HttpClient`].
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait WalletConnector: Debug {
    /// Create a wallet for `user_id` from `passphrase`
    async fn create_wallet(&self, user_id: &str, passphrase: &str) -> Result<Wallet, Error>;
    /// Wallet statistics
    async fn get_wallet_stats(&self, address: &str) -> Result<WalletStats, Error>;
    /// Wallet including its private key
    async fn get_wallet_with_private_key(&self, address: &str) -> Result<Wallet, Error>;
    /// Page of all chain transactions, `page` is one based
    async fn get_blockchain_transactions(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<BlockchainTransactions, Error>;
    /// Transactions touching `address`, typed `incoming`/`outgoing`
    async fn get_transaction_history(&self, address: &str) -> Result<Vec<Transaction>, Error>;
    /// Submit a transfer
    async fn send_coins(&self, request: SendCoinsRequest) -> Result<serde_json::Value, Error>;
    /// Set the address receiving mining rewards
    async fn set_mining_address(&self, address: &str) -> Result<String, Error>;
    /// Mining status
    async fn get_mining_status(&self) -> Result<MiningStatus, Error>;
    /// Set the mining difficulty
    async fn set_mining_difficulty(&self, difficulty: u32) -> Result<u32, Error>;
    /// Start mining, returns whether the node is mining
    async fn start_mining(&self) -> Result<bool, Error>;
    /// Stop mining, returns whether the node is mining
    async fn stop_mining(&self) -> Result<bool, Error>;
    /// Mine one block paying `miner_address`
    async fn mine_block(&self, miner_address: &str) -> Result<Block, Error>;
}
