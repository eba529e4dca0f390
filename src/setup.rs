//! Session bootstrap: key file, client, and faucet top-up
//!
//! `setup` is the one place two operations are sequenced with a conditional:
//! after loading or creating the wallet and connecting, it checks whether the
//! account exists on chain and, if not, asks the configured faucet for test
//! tokens. The faucet call is fire-and-forget: there is no confirmation wait
//! and no retry.

use crate::client::WasmClient;
use crate::config::NetworkConfig;
use crate::error::{ChainError, SetupError, WalletError};
use crate::rpc_client::SigningClient;
use crate::wallet::Wallet;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct FaucetRequest<'a> {
    ticker: &'a str,
    address: &'a str,
}

/// Load (or create) the wallet and return a connected signing client
///
/// Uses the key file from `key_file` if given, otherwise the configured
/// default. If the network has a faucet and the account does not exist on
/// chain yet, one credit request is issued before returning.
///
/// # Errors
///
/// Returns an error if wallet loading/creation fails, the account query
/// fails, or the faucet request fails.
pub async fn setup(
    config: &NetworkConfig,
    password: &str,
    key_file: Option<&Path>,
) -> Result<SigningClient, SetupError> {
    let key_file = key_file.unwrap_or(&config.wallet.key_file);
    let wallet = Wallet::load_or_create(key_file, password, config)?;
    let client = SigningClient::connect(wallet, config.clone())?;

    // ensure the account has some fee tokens
    if let Some(faucet) = &config.faucet {
        let account = client.get_account().await?;
        if account.is_none() {
            tracing::info!(
                token = %faucet.token,
                address = %client.sender(),
                "requesting tokens from faucet"
            );
            hit_faucet(&faucet.url, client.sender(), &faucet.token).await?;
        }
    }

    Ok(client)
}

/// Load (or create) the wallet at `key_file` and return its mnemonic phrase
///
/// # Errors
///
/// Returns an error if the wallet cannot be loaded or created.
pub fn recover_mnemonic(
    config: &NetworkConfig,
    password: &str,
    key_file: Option<&Path>,
) -> Result<String, WalletError> {
    let key_file = key_file.unwrap_or(&config.wallet.key_file);
    let wallet = Wallet::load_or_create(key_file, password, config)?;
    Ok(wallet.mnemonic())
}

async fn hit_faucet(url: &str, address: &str, ticker: &str) -> Result<(), ChainError> {
    let request = FaucetRequest { ticker, address };
    reqwest::Client::new()
        .post(url)
        .json(&request)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
