//! Example: deploy a CW20 token and distribute initial balances
//!
//! Expects a funded (or faucet-backed) account on the configured network.
//!
//! Run:
//!   cargo run --example deploy_token

use cw20_kit::{
    setup, Cw20Coin, Cw20Contract, InstantiateMsg, MinterResponse, NetworkConfig, WasmClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Setup....");
    let config = NetworkConfig::coralnet();
    let client = setup(&config, "12345678", None).await?;
    let sender = client.sender().to_string();
    println!("sender: {sender}");

    let cw20 = Cw20Contract::new(client);
    let code_id = cw20.upload().await?;
    println!("code id: {code_id}");

    let init = InstantiateMsg {
        name: "Golden Stars".to_string(),
        symbol: "STAR".to_string(),
        decimals: 2,
        // 100 STARs each
        initial_balances: vec![
            Cw20Coin {
                address: "coral1exta8hzrghyt5umd4jh55kfkmp0tv3hyg8krc5".to_string(),
                amount: "10000".to_string(),
            },
            Cw20Coin {
                address: "coral13mcejut8e5tncs59zcs4yn4envcd98vx682frk".to_string(),
                amount: "10000".to_string(),
            },
        ],
        mint: Some(MinterResponse {
            minter: sender.clone(),
            cap: None,
        }),
    };
    let star = cw20.instantiate(code_id, &init, "STAR", Some(&sender)).await?;
    println!("contract: {}", star.address());

    println!(
        "balance of coral13mcejut...: {}",
        star.balance(Some("coral13mcejut8e5tncs59zcs4yn4envcd98vx682frk"))
            .await?
    );
    println!("my balance: {}", star.balance(None).await?);

    Ok(())
}
