//! cw20-kit - SDK for deploying and interacting with CW20 token contracts
//!
//! This crate provides a high-level interface for working with cw20-base
//! token contracts on CosmWasm networks. It manages an encrypted key file,
//! builds per-operation fee tables, and wraps the chain's query/execute
//! endpoints in typed async calls.
//!
//! # Example
//!
//! ```ignore
//! use cw20_kit::{setup, Cw20Contract, NetworkConfig};
//!
//! // Create a client (loads or creates the key file, tops up from the faucet)
//! let config = NetworkConfig::coralnet();
//! let client = setup(&config, "12345678", None).await?;
//! println!("{:?}", client.get_account().await?);
//!
//! // Deploy a token and use it
//! let cw20 = Cw20Contract::new(client);
//! let code_id = cw20.upload().await?;
//! let star = cw20.instantiate(code_id, &init_msg, "STAR", None).await?;
//! println!("my balance: {}", star.balance(None).await?);
//! ```
//!
//! # Recovering the mnemonic
//!
//! ```ignore
//! use cw20_kit::{recover_mnemonic, NetworkConfig};
//!
//! let phrase = recover_mnemonic(&NetworkConfig::coralnet(), "12345678", None)?;
//! ```
//!
//! # Binding an existing contract
//!
//! ```ignore
//! let stars = Cw20Contract::new(client).bind("coral16t7y0vrtpqjw2d7jvc2209yan9002339mg4mrv");
//! println!("info: {:?}", stars.token_info().await?);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fee;
#[cfg(feature = "rpc")]
pub mod rpc_client;
#[cfg(feature = "rpc")]
pub mod setup;
pub mod token;
pub mod wallet;

#[cfg(test)]
mod mock_client;

// Re-export core types
pub use client::{Account, UploadMeta, WasmClient};
pub use config::{ConfigError, FaucetSettings, NetworkConfig};
pub use error::{ChainError, SetupError, WalletError};
pub use fee::{Coin, FeeTable, StdFee};
pub use token::{
    AllowanceInfo, BalanceResponse, Cw20Coin, Cw20Contract, Cw20Instance, InstantiateMsg,
    MinterResponse, TokenInfoResponse, CW20_WASM_URL,
};
pub use wallet::Wallet;

// Re-export the signing client and bootstrap helpers when RPC is enabled
#[cfg(feature = "rpc")]
pub use rpc_client::SigningClient;
#[cfg(feature = "rpc")]
pub use setup::{recover_mnemonic, setup};
