//! Configuration for connecting to CosmWasm networks
//!
//! This module provides a configuration system describing a target network:
//! the LCD endpoint, fee parameters, wallet derivation settings, and an
//! optional faucet for test tokens.
//!
//! # Example Configuration File (cw20-kit.toml)
//!
//! ```toml
//! [node]
//! lcd_url = "https://lcd.coralnet.cosmwasm.com"
//! chain_id = "cosmwasm-coral"
//!
//! [fee]
//! denom = "ushell"
//! gas_price = 0.025
//!
//! [wallet]
//! bech32_prefix = "coral"
//! hd_path = "m/44'/118'/0'/0/0"
//! key_file = "/home/user/.coral.key"
//!
//! [faucet]
//! token = "SHELL"
//! url = "https://faucet.coralnet.cosmwasm.com/credit"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Node endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSettings {
    /// LCD (REST) URL of the node, e.g. `https://lcd.coralnet.cosmwasm.com`
    pub lcd_url: String,
    /// Chain identifier, e.g. `cosmwasm-coral`
    pub chain_id: String,
}

/// Fee parameters used to build the per-operation fee table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSettings {
    /// Denomination fees are paid in, e.g. `ushell`
    pub denom: String,
    /// Gas price in `denom` per gas unit
    pub gas_price: f64,
}

/// Wallet derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSettings {
    /// Bech32 address prefix, e.g. `coral`
    pub bech32_prefix: String,
    /// BIP-44 derivation path, e.g. `m/44'/118'/0'/0/0`
    pub hd_path: String,
    /// Default encrypted key file location
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,
}

fn default_key_file() -> PathBuf {
    home_dir().join(".coral.key")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Faucet settings for requesting test tokens on first use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetSettings {
    /// Ticker the faucet dispenses, e.g. `SHELL`
    pub token: String,
    /// Faucet credit endpoint
    pub url: String,
}

/// Complete network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub node: NodeSettings,
    pub fee: FeeSettings,
    pub wallet: WalletSettings,
    /// Absent on networks without a faucet
    #[serde(default)]
    pub faucet: Option<FaucetSettings>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::coralnet()
    }
}

impl NetworkConfig {
    /// Configuration for the coralnet test network
    #[must_use]
    pub fn coralnet() -> Self {
        Self {
            node: NodeSettings {
                lcd_url: "https://lcd.coralnet.cosmwasm.com".to_string(),
                chain_id: "cosmwasm-coral".to_string(),
            },
            fee: FeeSettings {
                denom: "ushell".to_string(),
                gas_price: 0.025,
            },
            wallet: WalletSettings {
                bech32_prefix: "coral".to_string(),
                hd_path: "m/44'/118'/0'/0/0".to_string(),
                key_file: default_key_file(),
            },
            faucet: Some(FaucetSettings {
                token: "SHELL".to_string(),
                url: "https://faucet.coralnet.cosmwasm.com/credit".to_string(),
            }),
        }
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(ConfigError::Parse)
    }

    /// Serialize configuration to a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    /// Override the LCD endpoint and chain id
    #[must_use]
    pub fn with_node(mut self, lcd_url: &str, chain_id: &str) -> Self {
        self.node.lcd_url = lcd_url.to_string();
        self.node.chain_id = chain_id.to_string();
        self
    }

    /// Override the key file location
    #[must_use]
    pub fn with_key_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.wallet.key_file = path.into();
        self
    }

    /// Remove the faucet (for networks where tokens must be funded manually)
    #[must_use]
    pub fn without_faucet(mut self) -> Self {
        self.faucet = None;
        self
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
