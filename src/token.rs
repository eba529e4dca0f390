//! CW20 contract factory and instance facade
//!
//! The factory uploads the cw20-base artifact and instantiates token
//! contracts; an instance binds one contract address and exposes the token's
//! query and execute operations as direct pass-through calls. All token state
//! lives on chain and is fetched fresh per query; every method here is a
//! single round trip.
//!
//! # Example
//!
//! ```ignore
//! use cw20_kit::{Cw20Contract, InstantiateMsg, Cw20Coin};
//!
//! let cw20 = Cw20Contract::new(client);
//! let code_id = cw20.upload().await?;
//! let msg = InstantiateMsg {
//!     name: "Golden Stars".to_string(),
//!     symbol: "STAR".to_string(),
//!     decimals: 2,
//!     initial_balances: vec![Cw20Coin {
//!         address: "coral1exta8hzrghyt5umd4jh55kfkmp0tv3hyg8krc5".to_string(),
//!         amount: "10000".to_string(),
//!     }],
//!     mint: None,
//! };
//! let star = cw20.instantiate(code_id, &msg, "STAR", None).await?;
//! println!("{}", star.balance(None).await?);
//! ```

use crate::client::{ClientResult, WasmClient};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[cfg(feature = "rpc")]
use crate::client::UploadMeta;
#[cfg(feature = "rpc")]
use crate::error::ChainError;

/// Release artifact uploaded by [`Cw20Contract::upload`]
pub const CW20_WASM_URL: &str =
    "https://github.com/CosmWasm/cosmwasm-plus/releases/download/v0.1.1/cw20_base.wasm";

#[cfg(feature = "rpc")]
const CW20_SOURCE: &str = "https://github.com/CosmWasm/cosmwasm-plus";
#[cfg(feature = "rpc")]
const CW20_BUILDER: &str = "cosmwasm/rust-optimizer:0.10.1";

/// Initial token balance for one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cw20Coin {
    pub address: String,
    /// Decimal amount as a string to avoid precision loss
    pub amount: String,
}

/// Minting configuration and current minter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinterResponse {
    pub minter: String,
    /// Hard cap on total supply, unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<String>,
}

/// Instantiation parameters for a cw20-base contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_balances: Vec<Cw20Coin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<MinterResponse>,
}

/// Token metadata and supply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfoResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceResponse {
    pub allowance: String,
}

/// One spender's allowance, as listed by `all_allowances`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceInfo {
    pub spender: String,
    pub allowance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllAccountsResponse {
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllAllowancesResponse {
    pub allowances: Vec<AllowanceInfo>,
}

/// Read-only queries understood by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20QueryMsg {
    Balance {
        address: String,
    },
    Allowance {
        owner: String,
        spender: String,
    },
    TokenInfo {},
    Minter {},
    AllAccounts {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_after: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
    AllAllowances {
        owner: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_after: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
}

/// State-changing actions understood by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20ExecuteMsg {
    Mint {
        recipient: String,
        amount: String,
    },
    Transfer {
        recipient: String,
        amount: String,
    },
    Burn {
        amount: String,
    },
    Send {
        contract: String,
        amount: String,
        /// Base64-encoded hook payload delivered to the receiving contract
        msg: String,
    },
    IncreaseAllowance {
        spender: String,
        amount: String,
    },
    DecreaseAllowance {
        spender: String,
        amount: String,
    },
    TransferFrom {
        owner: String,
        recipient: String,
        amount: String,
    },
    SendFrom {
        owner: String,
        contract: String,
        amount: String,
        msg: String,
    },
    BurnFrom {
        owner: String,
        amount: String,
    },
}

/// Factory for uploading cw20-base code and instantiating token contracts
pub struct Cw20Contract<C> {
    client: Arc<C>,
}

impl<C: WasmClient> Cw20Contract<C> {
    /// Wrap a client in a contract factory
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Wrap an already shared client
    pub fn from_arc(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Download the pinned cw20-base release artifact and store it on chain
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Download`] if the artifact server answers with
    /// anything but 200, or the underlying submission error otherwise.
    #[cfg(feature = "rpc")]
    pub async fn upload(&self) -> ClientResult<u64> {
        self.upload_from(CW20_WASM_URL).await
    }

    /// Download a wasm artifact from `url` and store it on chain
    ///
    /// # Errors
    ///
    /// Same as [`Cw20Contract::upload`].
    #[cfg(feature = "rpc")]
    pub async fn upload_from(&self, url: &str) -> ClientResult<u64> {
        let wasm = download_wasm(url).await?;
        tracing::debug!(url, size = wasm.len(), "downloaded contract artifact");
        let meta = UploadMeta {
            source: Some(CW20_SOURCE.to_string()),
            builder: Some(CW20_BUILDER.to_string()),
        };
        self.client.upload(wasm, meta).await
    }

    /// Instantiate a token contract from an uploaded code id
    ///
    /// `label` is the public name of the contract in listings. Set `admin`
    /// (usually the sender address) to allow future migrations.
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn instantiate(
        &self,
        code_id: u64,
        msg: &InstantiateMsg,
        label: &str,
        admin: Option<&str>,
    ) -> ClientResult<Cw20Instance<C>> {
        let value = serde_json::to_value(msg)?;
        let address = self.client.instantiate(code_id, &value, label, admin).await?;
        Ok(self.bind(address))
    }

    /// Bind a facade to an existing contract address
    pub fn bind(&self, contract_address: impl Into<String>) -> Cw20Instance<C> {
        Cw20Instance {
            client: Arc::clone(&self.client),
            contract_address: contract_address.into(),
        }
    }

    /// Migrate a contract to a new code id (requires admin rights)
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn migrate(
        &self,
        instance: &Cw20Instance<C>,
        new_code_id: u64,
    ) -> ClientResult<String> {
        self.client
            .migrate(instance.address(), new_code_id, &serde_json::json!({}))
            .await
    }

    /// Hand contract admin rights to another address
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn update_admin(
        &self,
        instance: &Cw20Instance<C>,
        new_admin: &str,
    ) -> ClientResult<String> {
        self.client.update_admin(instance.address(), new_admin).await
    }
}

#[cfg(feature = "rpc")]
async fn download_wasm(url: &str) -> ClientResult<Vec<u8>> {
    let resp = reqwest::get(url).await?;
    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(ChainError::Download {
            status: status.as_u16(),
        });
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Facade over one deployed token contract
///
/// The bound address is immutable; all token state lives on chain. Queries
/// return decimal amounts as strings, executes return the transaction hash.
pub struct Cw20Instance<C> {
    client: Arc<C>,
    contract_address: String,
}

impl<C> Clone for Cw20Instance<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            contract_address: self.contract_address.clone(),
        }
    }
}

impl<C: WasmClient> Cw20Instance<C> {
    /// The bound contract address
    #[must_use]
    pub fn address(&self) -> &str {
        &self.contract_address
    }

    async fn query<T: serde::de::DeserializeOwned>(&self, msg: &Cw20QueryMsg) -> ClientResult<T> {
        let value = serde_json::to_value(msg)?;
        let raw = self.client.query_smart(&self.contract_address, &value).await?;
        Ok(serde_json::from_value(raw)?)
    }

    async fn exec(&self, msg: &Cw20ExecuteMsg) -> ClientResult<String> {
        let value = serde_json::to_value(msg)?;
        self.client.execute(&self.contract_address, &value).await
    }

    /// Balance of `address`, or of the sender when `None`
    ///
    /// # Errors
    ///
    /// Propagates the query error unmodified.
    pub async fn balance(&self, address: Option<&str>) -> ClientResult<String> {
        let address = address.unwrap_or_else(|| self.client.sender()).to_string();
        let resp: BalanceResponse = self.query(&Cw20QueryMsg::Balance { address }).await?;
        Ok(resp.balance)
    }

    /// Remaining allowance `spender` may draw from `owner`
    ///
    /// # Errors
    ///
    /// Propagates the query error unmodified.
    pub async fn allowance(&self, owner: &str, spender: &str) -> ClientResult<String> {
        let resp: AllowanceResponse = self
            .query(&Cw20QueryMsg::Allowance {
                owner: owner.to_string(),
                spender: spender.to_string(),
            })
            .await?;
        Ok(resp.allowance)
    }

    /// Token metadata and total supply
    ///
    /// # Errors
    ///
    /// Propagates the query error unmodified.
    pub async fn token_info(&self) -> ClientResult<TokenInfoResponse> {
        self.query(&Cw20QueryMsg::TokenInfo {}).await
    }

    /// Current minter, or `None` if the token is not mintable
    ///
    /// # Errors
    ///
    /// Propagates the query error unmodified.
    pub async fn minter(&self) -> ClientResult<Option<MinterResponse>> {
        self.query(&Cw20QueryMsg::Minter {}).await
    }

    /// Page through all addresses holding a balance
    ///
    /// # Errors
    ///
    /// Propagates the query error unmodified.
    pub async fn all_accounts(
        &self,
        start_after: Option<&str>,
        limit: Option<u32>,
    ) -> ClientResult<Vec<String>> {
        let resp: AllAccountsResponse = self
            .query(&Cw20QueryMsg::AllAccounts {
                start_after: start_after.map(str::to_string),
                limit,
            })
            .await?;
        Ok(resp.accounts)
    }

    /// Page through all allowances granted by `owner`
    ///
    /// # Errors
    ///
    /// Propagates the query error unmodified.
    pub async fn all_allowances(
        &self,
        owner: &str,
        start_after: Option<&str>,
        limit: Option<u32>,
    ) -> ClientResult<Vec<AllowanceInfo>> {
        let resp: AllAllowancesResponse = self
            .query(&Cw20QueryMsg::AllAllowances {
                owner: owner.to_string(),
                start_after: start_after.map(str::to_string),
                limit,
            })
            .await?;
        Ok(resp.allowances)
    }

    /// Mint `amount` new tokens to `recipient` (sender must be the minter)
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn mint(&self, recipient: &str, amount: &str) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount: amount.to_string(),
        })
        .await
    }

    /// Move `amount` tokens from the sender to `recipient`
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn transfer(&self, recipient: &str, amount: &str) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount: amount.to_string(),
        })
        .await
    }

    /// Destroy `amount` tokens from the sender's balance
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn burn(&self, amount: &str) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::Burn {
            amount: amount.to_string(),
        })
        .await
    }

    /// Move `amount` tokens to the contract `recipient` and trigger its
    /// receive hook with `hook` as payload
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn send(&self, contract: &str, amount: &str, hook: &Value) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::Send {
            contract: contract.to_string(),
            amount: amount.to_string(),
            msg: BASE64.encode(serde_json::to_vec(hook)?),
        })
        .await
    }

    /// Raise the allowance of `spender` by `amount`
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn increase_allowance(&self, spender: &str, amount: &str) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::IncreaseAllowance {
            spender: spender.to_string(),
            amount: amount.to_string(),
        })
        .await
    }

    /// Lower the allowance of `spender` by `amount`
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn decrease_allowance(&self, spender: &str, amount: &str) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::DecreaseAllowance {
            spender: spender.to_string(),
            amount: amount.to_string(),
        })
        .await
    }

    /// Move `amount` tokens from `owner` to `recipient` using the sender's
    /// allowance
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn transfer_from(
        &self,
        owner: &str,
        recipient: &str,
        amount: &str,
    ) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::TransferFrom {
            owner: owner.to_string(),
            recipient: recipient.to_string(),
            amount: amount.to_string(),
        })
        .await
    }

    /// Like [`Cw20Instance::send`], drawing from `owner`'s allowance
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn send_from(
        &self,
        owner: &str,
        contract: &str,
        amount: &str,
        hook: &Value,
    ) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::SendFrom {
            owner: owner.to_string(),
            contract: contract.to_string(),
            amount: amount.to_string(),
            msg: BASE64.encode(serde_json::to_vec(hook)?),
        })
        .await
    }

    /// Destroy `amount` tokens from `owner` using the sender's allowance
    ///
    /// # Errors
    ///
    /// Propagates the submission error unmodified.
    pub async fn burn_from(&self, owner: &str, amount: &str) -> ClientResult<String> {
        self.exec(&Cw20ExecuteMsg::BurnFrom {
            owner: owner.to_string(),
            amount: amount.to_string(),
        })
        .await
    }
}
