//! Error types for cw20-kit operations

use thiserror::Error;

/// Errors that can occur while talking to the chain
#[derive(Debug, Error)]
pub enum ChainError {
    #[cfg(feature = "rpc")]
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("artifact download failed with status {status}")]
    Download { status: u16 },

    #[error("node returned status {status}: {body}")]
    Node { status: u16, body: String },

    #[error("transaction failed with code {code}: {raw_log}")]
    TxFailed { code: u32, raw_log: String },

    #[error("attribute `{key}` not found in transaction events")]
    MissingEventAttribute { key: &'static str },

    #[error("invalid address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build transaction: {0}")]
    TxBuild(String),

    #[error("invalid response payload: {0}")]
    Response(#[from] serde_json::Error),
}

/// Errors that can occur during wallet operations
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid mnemonic: {0}")]
    Mnemonic(String),

    #[error("key file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to encrypt key file")]
    Encrypt,

    #[error("failed to decrypt key file (wrong password?)")]
    Decrypt,

    #[error("invalid derivation path `{0}`")]
    DerivationPath(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Errors that can occur while setting up a signing session
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
