//! Wallet backend types
//!
//! Models of the JSON returned by the MyCoin REST backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Network the backend runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Network name
    pub name: String,
    /// Chain id
    pub chain_id: u64,
    /// Currency ticker
    pub currency: String,
}

/// Links attached to a wallet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletLinks {
    /// Explorer link
    pub view_on_explorer: String,
    /// Any other links returned by the backend
    #[serde(flatten)]
    pub other: HashMap<String, String>,
}

/// Wallet as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Wallet address
    pub address: String,
    /// Owner id
    #[serde(default)]
    pub user_id: String,
    /// Balance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// Private key (only on the private key endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Recovery passphrase, when the backend generated one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    /// Creation date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Whether the backend holds a private key for the wallet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_private_key: Option<bool>,
    /// Network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkInfo>,
    /// QR code of the address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    /// Status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<WalletLinks>,
}

/// Wallet statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStats {
    /// Wallet address
    pub address: String,
    /// Balance
    #[serde(default)]
    pub balance: f64,
    /// Network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkInfo>,
    /// Creation date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Whether the backend holds a private key for the wallet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_private_key: Option<bool>,
    /// QR code of the address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    /// Links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<WalletLinks>,
}

impl From<&Wallet> for WalletStats {
    fn from(wallet: &Wallet) -> Self {
        Self {
            address: wallet.address.clone(),
            balance: wallet.balance.unwrap_or(0.0),
            network: wallet.network.clone(),
            created_at: wallet.created_at.clone(),
            status: wallet.status.clone(),
            has_private_key: Some(wallet.has_private_key.unwrap_or(false)),
            qr_code: wallet.qr_code.clone(),
            links: wallet.links.clone(),
        }
    }
}

/// Transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Backend id
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub backend_id: Option<String>,
    /// Sender
    pub from_address: String,
    /// Recipient
    pub to_address: String,
    /// Amount
    pub amount: f64,
    /// Kind (`transfer`, `reward`, or `incoming`/`outgoing` in a history view)
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Hash
    #[serde(default)]
    pub hash: String,
    /// Status
    #[serde(default)]
    pub status: String,
    /// Timestamp as returned by the backend
    #[serde(default)]
    pub timestamp: String,
    /// Display id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display transaction id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl Transaction {
    /// Fill `id` and `transaction_id` from the first available of
    /// `_id`, `id`, `transactionId`, `hash`
    pub fn with_display_ids(mut self) -> Self {
        let id = self
            .backend_id
            .clone()
            .or_else(|| self.id.clone())
            .or_else(|| self.transaction_id.clone())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.hash.clone());

        self.id = Some(id.clone());
        self.transaction_id = Some(id);
        self
    }

    /// Direction relative to `address`
    pub fn direction_for(&self, address: &str) -> TransactionDirection {
        if self.from_address == address {
            TransactionDirection::Outgoing
        } else {
            TransactionDirection::Incoming
        }
    }
}

/// Transaction direction relative to a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionDirection {
    /// Received
    Incoming,
    /// Sent
    Outgoing,
}

impl std::fmt::Display for TransactionDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionDirection::Incoming => write!(f, "incoming"),
            TransactionDirection::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// Pagination info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Total number of items
    pub total: u64,
    /// Current page
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Number of pages
    pub pages: u32,
}

/// A page of blockchain transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockchainTransactions {
    /// Transactions
    pub transactions: Vec<Transaction>,
    /// Pagination
    pub pagination: PaginationInfo,
}

/// Mining status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningStatus {
    /// Whether the node is mining
    pub mining: bool,
    /// Current difficulty
    pub difficulty: u32,
    /// Address receiving rewards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mining_address: Option<String>,
}

/// Mined block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block time
    pub timestamp: u64,
    /// Included transactions
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Previous block hash
    pub previous_hash: String,
    /// Height
    pub index: u64,
    /// Nonce
    pub nonce: u64,
    /// Block hash
    pub hash: String,
}

/// Response envelope used by every backend endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    #[serde(default)]
    pub success: bool,
    /// Human readable message
    #[serde(default)]
    pub message: String,
    /// Payload
    pub data: T,
}
