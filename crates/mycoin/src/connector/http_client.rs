//! HTTP client for the MyCoin backend

use async_trait::async_trait;
use mycoin_common::wallet::{
    ApiResponse, Block, BlockchainTransactions, MiningStatus, PaginationInfo, Transaction, Wallet,
    WalletStats,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::{CreateWalletRequest, Error, SendCoinsRequest, WalletConnector};

fn transport_error(e: reqwest::Error) -> Error {
    Error::HttpError(
        e.status().map(|status_code| status_code.as_u16()),
        e.to_string(),
    )
}

/// Error body returned by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlockchainPage {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    pagination: Option<PaginationInfo>,
}

/// History payload, either wrapped or a bare list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryData {
    Wrapped { transactions: Vec<Transaction> },
    List(Vec<Transaction>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct AddressData {
    address: String,
}

#[derive(Debug, Deserialize)]
struct DifficultyData {
    difficulty: u32,
}

#[derive(Debug, Deserialize)]
struct MiningData {
    mining: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MineBlockRequest<'a> {
    miner_address: &'a str,
}

/// Http Client
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    api_url: Url,
}

impl HttpClient {
    /// Create new [`HttpClient`]
    pub fn new(api_url: Url) -> Self {
        Self {
            inner: Client::new(),
            api_url,
        }
    }

    /// Create new [`HttpClient`] from a url string
    pub fn from_url_str(api_url: &str) -> Result<Self, Error> {
        Ok(Self::new(Url::parse(api_url)?))
    }

    /// Backend base url
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Custom(format!("Invalid api url: {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn http_get<R: DeserializeOwned>(
        &self,
        url: Url,
        action: &'static str,
    ) -> Result<R, Error> {
        self.execute(self.inner.get(url), action).await
    }

    async fn http_post<P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: Url,
        payload: &P,
        action: &'static str,
    ) -> Result<R, Error> {
        self.execute(self.inner.post(url).json(payload), action)
            .await
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &'static str,
    ) -> Result<R, Error> {
        let response = request.send().await.map_err(transport_error)?;
        decode_response(response, action).await
    }
}

async fn decode_response<R: DeserializeOwned>(
    response: Response,
    action: &'static str,
) -> Result<R, Error> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        return Err(Error::Status {
            action,
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str::<R>(&body).map_err(|err| {
        tracing::warn!("Http Response error: {}", err);
        err.into()
    })
}

/// Mining endpoints answer 404 when the backend does not serve them
fn mining_result<T>(result: Result<T, Error>) -> Result<T, Error> {
    match result {
        Err(Error::Status { status: 404, .. }) => Err(Error::MiningUnavailable),
        other => other,
    }
}

/// Type history rows relative to `address` and fill display ids
fn history_for(address: &str, transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions
        .into_iter()
        .map(|tx| {
            let mut tx = tx.with_display_ids();
            tx.kind = tx.direction_for(address).to_string();
            tx
        })
        .collect()
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl WalletConnector for HttpClient {
    #[instrument(skip_all)]
    async fn create_wallet(&self, user_id: &str, passphrase: &str) -> Result<Wallet, Error> {
        let url = self.endpoint(&["wallets"])?;
        let request = CreateWalletRequest {
            user_id: user_id.to_string(),
            passphrase: Some(passphrase.to_string()),
        };

        let response: ApiResponse<Wallet> =
            self.http_post(url, &request, "create wallet").await?;
        Ok(response.data)
    }

    #[instrument(skip(self))]
    async fn get_wallet_stats(&self, address: &str) -> Result<WalletStats, Error> {
        let url = self.endpoint(&["wallets", address, "stats"])?;
        let response: ApiResponse<WalletStats> =
            self.http_get(url, "get wallet stats").await?;
        Ok(response.data)
    }

    #[instrument(skip(self))]
    async fn get_wallet_with_private_key(&self, address: &str) -> Result<Wallet, Error> {
        let url = self.endpoint(&["wallets", address])?;
        let response: ApiResponse<Wallet> = self.http_get(url, "get wallet").await?;
        Ok(response.data)
    }

    #[instrument(skip(self))]
    async fn get_blockchain_transactions(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<BlockchainTransactions, Error> {
        let mut url = self.endpoint(&["transactions", "blockchain"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());

        let response: ApiResponse<BlockchainPage> = self
            .http_get(url, "get blockchain transactions")
            .await?;

        let page_data = response.data;
        Ok(BlockchainTransactions {
            transactions: page_data
                .transactions
                .into_iter()
                .map(Transaction::with_display_ids)
                .collect(),
            pagination: page_data.pagination.unwrap_or(PaginationInfo {
                total: 0,
                page,
                limit,
                pages: 1,
            }),
        })
    }

    #[instrument(skip(self))]
    async fn get_transaction_history(&self, address: &str) -> Result<Vec<Transaction>, Error> {
        let url = self.endpoint(&["transactions", address, "history"])?;

        let response: ApiResponse<Option<HistoryData>> =
            match self.http_get(url, "get transaction history").await {
                Ok(response) => response,
                Err(Error::Status { status: 404, .. }) => {
                    tracing::debug!("No transaction history found");
                    return Ok(Vec::new());
                }
                Err(err) => return Err(err),
            };

        let transactions = match response.data {
            Some(HistoryData::Wrapped { transactions }) | Some(HistoryData::List(transactions)) => {
                transactions
            }
            Some(HistoryData::Other(_)) | None => Vec::new(),
        };

        tracing::debug!("Found {} transactions", transactions.len());

        Ok(history_for(address, transactions))
    }

    #[instrument(skip_all)]
    async fn send_coins(&self, request: SendCoinsRequest) -> Result<serde_json::Value, Error> {
        let url = self.endpoint(&["transactions", "send"])?;
        let response: ApiResponse<Option<serde_json::Value>> =
            self.http_post(url, &request, "send coins").await?;
        Ok(response.data.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn set_mining_address(&self, address: &str) -> Result<String, Error> {
        let url = self.endpoint(&["mining", "address"])?;
        let response: ApiResponse<AddressData> = mining_result(
            self.http_post(
                url,
                &serde_json::json!({ "address": address }),
                "set mining address",
            )
            .await,
        )?;
        Ok(response.data.address)
    }

    #[instrument(skip(self))]
    async fn get_mining_status(&self) -> Result<MiningStatus, Error> {
        let url = self.endpoint(&["mining", "status"])?;
        let response: ApiResponse<MiningStatus> =
            mining_result(self.http_get(url, "get mining status").await)?;
        Ok(response.data)
    }

    #[instrument(skip(self))]
    async fn set_mining_difficulty(&self, difficulty: u32) -> Result<u32, Error> {
        let url = self.endpoint(&["mining", "difficulty"])?;
        let response: ApiResponse<DifficultyData> = mining_result(
            self.http_post(
                url,
                &serde_json::json!({ "difficulty": difficulty }),
                "set mining difficulty",
            )
            .await,
        )?;
        Ok(response.data.difficulty)
    }

    #[instrument(skip(self))]
    async fn start_mining(&self) -> Result<bool, Error> {
        let url = self.endpoint(&["mining", "start"])?;
        let response: ApiResponse<MiningData> = mining_result(
            self.http_post(url, &serde_json::json!({}), "start mining")
                .await,
        )?;
        Ok(response.data.mining)
    }

    #[instrument(skip(self))]
    async fn stop_mining(&self) -> Result<bool, Error> {
        let url = self.endpoint(&["mining", "stop"])?;
        let response: ApiResponse<MiningData> = mining_result(
            self.http_post(url, &serde_json::json!({}), "stop mining")
                .await,
        )?;
        Ok(response.data.mining)
    }

    #[instrument(skip(self))]
    async fn mine_block(&self, miner_address: &str) -> Result<Block, Error> {
        let url = self.endpoint(&["mining", "mine-block"])?;
        let response: ApiResponse<Block> = mining_result(
            self.http_post(url, &MineBlockRequest { miner_address }, "mine block")
                .await,
        )?;
        Ok(response.data)
    }
}
