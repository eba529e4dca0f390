//! Example: interact with an already deployed CW20 token
//!
//! Binds an existing contract address, inspects the token, mints to the
//! sender, and transfers a few tokens.
//!
//! Run:
//!   cargo run --example token_usage

use cw20_kit::{setup, Cw20Contract, NetworkConfig, WasmClient};

const TOKEN_ADDRESS: &str = "coral16t7y0vrtpqjw2d7jvc2209yan9002339mg4mrv";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = NetworkConfig::coralnet();
    let client = setup(&config, "12345678", None).await?;
    let sender = client.sender().to_string();

    let stars = Cw20Contract::new(client).bind(TOKEN_ADDRESS);

    println!("info: {:?}", stars.token_info().await?);
    println!("minter: {:?}", stars.minter().await?);

    println!("my balance: {}", stars.balance(None).await?);
    println!("minting myself 100 STAR");
    let mint_tx = stars.mint(&sender, "10000").await?;
    println!("tx: {mint_tx}");
    println!("my balance: {}", stars.balance(None).await?);

    let lucky = "coral1hf50trj7plz2sd8cmcvn7c8ruh3tjhc2nhyl7l";
    println!("sending 5 STAR to {lucky}");
    let transfer_tx = stars.transfer(lucky, "500").await?;
    println!("tx: {transfer_tx}");
    println!("balance of {lucky}: {}", stars.balance(Some(lucky)).await?);
    println!("my balance: {}", stars.balance(None).await?);

    Ok(())
}
