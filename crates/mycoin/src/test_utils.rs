#![cfg(test)]
#![allow(missing_docs)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mycoin_common::wallet::{
    Block, BlockchainTransactions, MiningStatus, PaginationInfo, Transaction, Wallet, WalletStats,
};

use crate::connector::{Error, SendCoinsRequest, WalletConnector};

/// Create a test wallet
pub fn test_wallet(address: &str) -> Wallet {
    Wallet {
        address: address.to_string(),
        user_id: "test-user".to_string(),
        ..Default::default()
    }
}

/// Create a test transaction
pub fn test_transaction(from: &str, to: &str, amount: f64) -> Transaction {
    Transaction {
        backend_id: Some(format!("tx_{}", uuid::Uuid::new_v4())),
        from_address: from.to_string(),
        to_address: to.to_string(),
        amount,
        kind: "transfer".to_string(),
        hash: "0xhash".to_string(),
        status: "confirmed".to_string(),
        timestamp: "2024-01-01T00:00:00Z".to_string(),
        ..Default::default()
    }
    .with_display_ids()
}

fn connection_refused() -> Error {
    Error::HttpError(None, "connection refused".to_string())
}

/// Mock WalletConnector
#[derive(Debug)]
pub struct MockWalletConnector {
    create_calls: Mutex<Vec<(String, String)>>,
    create_failures: Mutex<usize>,
    create_delay: Mutex<Option<Duration>>,
    send_calls: Mutex<usize>,
    mining_available: Mutex<bool>,
    mining_status: Mutex<MiningStatus>,
}

impl MockWalletConnector {
    pub fn new() -> Self {
        Self {
            create_calls: Mutex::new(Vec::new()),
            create_failures: Mutex::new(0),
            create_delay: Mutex::new(None),
            send_calls: Mutex::new(0),
            mining_available: Mutex::new(true),
            mining_status: Mutex::new(MiningStatus {
                mining: false,
                difficulty: 2,
                mining_address: None,
            }),
        }
    }

    /// Fail the next `times` wallet creations
    pub fn fail_create(&self, times: usize) {
        *self.create_failures.lock().unwrap() = times;
    }

    /// Suspend wallet creation for `delay`
    pub fn set_create_delay(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = Some(delay);
    }

    pub fn create_calls(&self) -> Vec<(String, String)> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn send_calls(&self) -> usize {
        *self.send_calls.lock().unwrap()
    }

    pub fn set_mining_available(&self, available: bool) {
        *self.mining_available.lock().unwrap() = available;
    }

    fn mining(&self) -> Result<(), Error> {
        if *self.mining_available.lock().unwrap() {
            Ok(())
        } else {
            Err(Error::MiningUnavailable)
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl WalletConnector for MockWalletConnector {
    async fn create_wallet(&self, user_id: &str, passphrase: &str) -> Result<Wallet, Error> {
        self.create_calls
            .lock()
            .unwrap()
            .push((user_id.to_string(), passphrase.to_string()));

        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        {
            let mut failures = self.create_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(connection_refused());
            }
        }

        Ok(Wallet {
            address: "0xmock".to_string(),
            user_id: user_id.to_string(),
            ..Default::default()
        })
    }

    async fn get_wallet_stats(&self, address: &str) -> Result<WalletStats, Error> {
        Ok(WalletStats {
            address: address.to_string(),
            balance: 100.0,
            ..Default::default()
        })
    }

    async fn get_wallet_with_private_key(&self, address: &str) -> Result<Wallet, Error> {
        Ok(Wallet {
            address: address.to_string(),
            user_id: "test-user".to_string(),
            private_key: Some("mock-private-key".to_string()),
            has_private_key: Some(true),
            ..Default::default()
        })
    }

    async fn get_blockchain_transactions(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<BlockchainTransactions, Error> {
        Ok(BlockchainTransactions {
            transactions: vec![
                test_transaction("0xa", "0xb", 1.0),
                test_transaction("0xb", "0xc", 2.0),
            ],
            pagination: PaginationInfo {
                total: 2,
                page,
                limit,
                pages: 1,
            },
        })
    }

    async fn get_transaction_history(&self, address: &str) -> Result<Vec<Transaction>, Error> {
        let mut tx = test_transaction("0xsomeone", address, 5.0);
        tx.kind = tx.direction_for(address).to_string();
        Ok(vec![tx])
    }

    async fn send_coins(&self, request: SendCoinsRequest) -> Result<serde_json::Value, Error> {
        *self.send_calls.lock().unwrap() += 1;
        Ok(serde_json::json!({
            "fromAddress": request.from_address,
            "toAddress": request.to_address,
            "amount": request.amount,
        }))
    }

    async fn set_mining_address(&self, address: &str) -> Result<String, Error> {
        self.mining()?;
        self.mining_status.lock().unwrap().mining_address = Some(address.to_string());
        Ok(address.to_string())
    }

    async fn get_mining_status(&self) -> Result<MiningStatus, Error> {
        self.mining()?;
        Ok(self.mining_status.lock().unwrap().clone())
    }

    async fn set_mining_difficulty(&self, difficulty: u32) -> Result<u32, Error> {
        self.mining()?;
        self.mining_status.lock().unwrap().difficulty = difficulty;
        Ok(difficulty)
    }

    async fn start_mining(&self) -> Result<bool, Error> {
        self.mining()?;
        self.mining_status.lock().unwrap().mining = true;
        Ok(true)
    }

    async fn stop_mining(&self) -> Result<bool, Error> {
        self.mining()?;
        self.mining_status.lock().unwrap().mining = false;
        Ok(false)
    }

    async fn mine_block(&self, miner_address: &str) -> Result<Block, Error> {
        self.mining()?;
        Ok(Block {
            timestamp: 1_700_000_000_000,
            transactions: vec![test_transaction("0x0", miner_address, 50.0)],
            previous_hash: "0xprev".to_string(),
            index: 1,
            nonce: 42,
            hash: "0xblock".to_string(),
        })
    }
}
