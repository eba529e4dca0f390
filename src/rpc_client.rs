//! LCD-based WasmClient implementation for connecting to CosmWasm nodes
//!
//! This module provides an implementation of the `WasmClient` trait that
//! talks to a node's LCD (REST) endpoint. Queries are plain GETs; transactions
//! are signed locally with the wallet's key and broadcast in block mode so the
//! assigned code id or contract address can be read back from the transaction
//! logs in the same call.
//!
//! # Example
//!
//! ```ignore
//! use cw20_kit::{NetworkConfig, SigningClient, Wallet};
//!
//! let config = NetworkConfig::coralnet();
//! let wallet = Wallet::load_or_create(&config.wallet.key_file, "hunter2", &config)?;
//! let client = SigningClient::connect(wallet, config)?;
//!
//! let account = client.get_account().await?;
//! println!("{account:?}");
//! ```

use crate::client::{Account, ClientResult, UploadMeta, WasmClient};
use crate::config::NetworkConfig;
use crate::error::ChainError;
use crate::fee::{FeeTable, StdFee};
use crate::wallet::Wallet;
use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD as BASE64, URL_SAFE as BASE64_URL};
use base64::Engine as _;
use cosmrs::cosmwasm::{
    MsgExecuteContract, MsgInstantiateContract, MsgMigrateContract, MsgStoreCode, MsgUpdateAdmin,
};
use cosmrs::tendermint::chain::Id as ChainId;
use cosmrs::tx::{self, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Any};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Signing client bound to one wallet and one network
///
/// Holds the wallet, the per-operation fee table, and the node URL. Usage is
/// sequential: each call is a single round trip awaiting the node's response.
#[derive(Debug)]
pub struct SigningClient {
    http: reqwest::Client,
    config: NetworkConfig,
    wallet: Wallet,
    fees: FeeTable,
    sender: AccountId,
}

impl SigningClient {
    /// Build a client from a wallet and network configuration
    ///
    /// Derives the sender address and fee table locally; no network call
    /// occurs here.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet address does not parse as a bech32
    /// account id.
    pub fn connect(wallet: Wallet, config: NetworkConfig) -> Result<Self, ChainError> {
        let sender: AccountId =
            wallet
                .address()
                .parse()
                .map_err(|e: cosmrs::ErrorReport| ChainError::InvalidAddress {
                    address: wallet.address().to_string(),
                    reason: e.to_string(),
                })?;
        let fees = FeeTable::build(&config);

        Ok(Self {
            http: reqwest::Client::new(),
            config,
            wallet,
            fees,
            sender,
        })
    }

    /// The network configuration this client was built with
    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// The per-operation fee table
    #[must_use]
    pub fn fee_table(&self) -> &FeeTable {
        &self.fees
    }

    /// The wallet backing this client
    #[must_use]
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    fn base_url(&self) -> &str {
        self.config.node.lcd_url.trim_end_matches('/')
    }

    async fn fetch_account(&self, address: &str) -> ClientResult<Option<Account>> {
        let url = format!("{}/cosmos/auth/v1beta1/accounts/{address}", self.base_url());
        let resp = self.http.get(&url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChainError::Node {
                status: status.as_u16(),
                body,
            });
        }

        let payload: AccountResponse = resp.json().await?;
        Ok(Some(Account {
            address: payload.account.address,
            account_number: payload.account.account_number,
            sequence: payload.account.sequence,
        }))
    }

    fn build_fee(&self, fee: &StdFee) -> ClientResult<tx::Fee> {
        let coin = &fee.amount[0];
        let denom: cosmrs::Denom = coin
            .denom
            .parse()
            .map_err(|e: cosmrs::ErrorReport| ChainError::TxBuild(e.to_string()))?;
        Ok(tx::Fee::from_amount_and_gas(
            cosmrs::Coin {
                denom,
                amount: coin.amount,
            },
            fee.gas,
        ))
    }

    /// Sign a single message, broadcast it in block mode, and return the
    /// committed transaction response. Non-zero result codes become errors.
    async fn sign_and_broadcast(
        &self,
        msg: Any,
        fee: &StdFee,
        memo: &str,
    ) -> ClientResult<TxResponse> {
        let account = self.fetch_account(self.wallet.address()).await?.ok_or_else(|| {
            ChainError::TxBuild(format!(
                "account {} not found on chain (no funds?)",
                self.wallet.address()
            ))
        })?;

        let chain_id: ChainId = self
            .config
            .node
            .chain_id
            .parse()
            .map_err(|e| ChainError::TxBuild(format!("invalid chain id: {e}")))?;

        let body = tx::Body::new(vec![msg], memo, 0u32);
        let signer_info =
            SignerInfo::single_direct(Some(self.wallet.public_key()), account.sequence);
        let auth_info = signer_info.auth_info(self.build_fee(fee)?);
        let sign_doc = SignDoc::new(&body, &auth_info, &chain_id, account.account_number)
            .map_err(|e| ChainError::TxBuild(e.to_string()))?;
        let tx_bytes = sign_doc
            .sign(self.wallet.signing_key())
            .map_err(|e| ChainError::TxBuild(e.to_string()))?
            .to_bytes()
            .map_err(|e| ChainError::TxBuild(e.to_string()))?;

        let url = format!("{}/cosmos/tx/v1beta1/txs", self.base_url());
        let request = BroadcastRequest {
            tx_bytes: BASE64.encode(tx_bytes),
            mode: "BROADCAST_MODE_BLOCK",
        };
        let resp = self.http.post(&url).json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChainError::Node {
                status: status.as_u16(),
                body,
            });
        }

        let payload: BroadcastResponse = resp.json().await?;
        let tx_response = payload.tx_response;
        if tx_response.code != 0 {
            return Err(ChainError::TxFailed {
                code: tx_response.code,
                raw_log: tx_response.raw_log,
            });
        }

        tracing::debug!(txhash = %tx_response.txhash, "transaction committed");
        Ok(tx_response)
    }

    fn parse_account_id(address: &str) -> ClientResult<AccountId> {
        address
            .parse()
            .map_err(|e: cosmrs::ErrorReport| ChainError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl WasmClient for SigningClient {
    fn sender(&self) -> &str {
        self.wallet.address()
    }

    async fn get_account(&self) -> ClientResult<Option<Account>> {
        self.fetch_account(self.wallet.address()).await
    }

    async fn upload(&self, wasm: Vec<u8>, meta: UploadMeta) -> ClientResult<u64> {
        let memo = match (&meta.source, &meta.builder) {
            (Some(source), Some(builder)) => format!("Upload {source} built by {builder}"),
            (Some(source), None) => format!("Upload {source}"),
            _ => String::new(),
        };

        let msg = MsgStoreCode {
            sender: self.sender.clone(),
            wasm_byte_code: wasm,
            instantiate_permission: None,
        }
        .to_any()
        .map_err(|e| ChainError::TxBuild(e.to_string()))?;

        let resp = self.sign_and_broadcast(msg, &self.fees.upload, &memo).await?;
        let value = find_event_attribute(&resp, "code_id")?;
        // Newer nodes quote numeric event values
        value
            .trim_matches('"')
            .parse()
            .map_err(|_| ChainError::TxBuild(format!("unparseable code_id `{value}`")))
    }

    async fn instantiate(
        &self,
        code_id: u64,
        msg: &Value,
        label: &str,
        admin: Option<&str>,
    ) -> ClientResult<String> {
        let admin = admin.map(Self::parse_account_id).transpose()?;

        let msg = MsgInstantiateContract {
            sender: self.sender.clone(),
            admin,
            code_id,
            label: Some(label.to_string()),
            msg: serde_json::to_vec(msg)?,
            funds: Vec::new(),
        }
        .to_any()
        .map_err(|e| ChainError::TxBuild(e.to_string()))?;

        let memo = format!("Init {label}");
        let resp = self.sign_and_broadcast(msg, &self.fees.init, &memo).await?;
        find_event_attribute(&resp, "_contract_address")
            .or_else(|_| find_event_attribute(&resp, "contract_address"))
    }

    async fn execute(&self, contract: &str, msg: &Value) -> ClientResult<String> {
        let msg = MsgExecuteContract {
            sender: self.sender.clone(),
            contract: Self::parse_account_id(contract)?,
            msg: serde_json::to_vec(msg)?,
            funds: Vec::new(),
        }
        .to_any()
        .map_err(|e| ChainError::TxBuild(e.to_string()))?;

        let resp = self.sign_and_broadcast(msg, &self.fees.exec, "").await?;
        Ok(resp.txhash)
    }

    async fn query_smart(&self, contract: &str, msg: &Value) -> ClientResult<Value> {
        let encoded = BASE64_URL.encode(serde_json::to_vec(msg)?);
        let url = format!(
            "{}/cosmwasm/wasm/v1/contract/{contract}/smart/{encoded}",
            self.base_url()
        );
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChainError::Node {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SmartQueryResponse = resp.json().await?;
        Ok(payload.data)
    }

    async fn migrate(
        &self,
        contract: &str,
        new_code_id: u64,
        msg: &Value,
    ) -> ClientResult<String> {
        let msg = MsgMigrateContract {
            sender: self.sender.clone(),
            contract: Self::parse_account_id(contract)?,
            code_id: new_code_id,
            msg: serde_json::to_vec(msg)?,
        }
        .to_any()
        .map_err(|e| ChainError::TxBuild(e.to_string()))?;

        let resp = self.sign_and_broadcast(msg, &self.fees.migrate, "").await?;
        Ok(resp.txhash)
    }

    async fn update_admin(&self, contract: &str, new_admin: &str) -> ClientResult<String> {
        let msg = MsgUpdateAdmin {
            sender: self.sender.clone(),
            contract: Self::parse_account_id(contract)?,
            new_admin: Self::parse_account_id(new_admin)?,
        }
        .to_any()
        .map_err(|e| ChainError::TxBuild(e.to_string()))?;

        let resp = self
            .sign_and_broadcast(msg, &self.fees.change_admin, "")
            .await?;
        Ok(resp.txhash)
    }
}

/// Committed transaction response, as returned by the LCD broadcast endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TxResponse {
    pub txhash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub logs: Vec<TxLog>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxLog {
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<TxAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Serialize)]
struct BroadcastRequest {
    tx_bytes: String,
    mode: &'static str,
}

#[derive(Deserialize)]
struct BroadcastResponse {
    tx_response: TxResponse,
}

#[derive(Deserialize)]
struct SmartQueryResponse {
    data: Value,
}

#[derive(Deserialize)]
struct AccountResponse {
    account: RawBaseAccount,
}

#[derive(Deserialize)]
struct RawBaseAccount {
    address: String,
    #[serde(default, deserialize_with = "de_u64_from_string")]
    account_number: u64,
    #[serde(default, deserialize_with = "de_u64_from_string")]
    sequence: u64,
}

// The LCD encodes 64-bit integers as JSON strings
fn de_u64_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn find_event_attribute(resp: &TxResponse, key: &'static str) -> ClientResult<String> {
    resp.logs
        .iter()
        .flat_map(|log| &log.events)
        .flat_map(|event| &event.attributes)
        .find(|attr| attr.key == key)
        .map(|attr| attr.value.clone())
        .ok_or(ChainError::MissingEventAttribute { key })
}
