//! Abstract interface for submitting to and querying CosmWasm chains

use crate::error::ChainError;
use async_trait::async_trait;
use serde_json::Value;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ChainError>;

/// On-chain account state, as reported by the auth module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub address: String,
    pub account_number: u64,
    pub sequence: u64,
}

/// Provenance metadata attached to a code upload
#[derive(Debug, Clone, Default)]
pub struct UploadMeta {
    /// Source repository of the contract code
    pub source: Option<String>,
    /// Builder image that produced the artifact
    pub builder: Option<String>,
}

/// Abstract interface for interacting with CosmWasm chains
///
/// This trait allows the contract facade to work with different backends
/// (a live node, or an in-memory chain in tests) through a unified interface.
/// Every method is a single network round trip with no retries; failures
/// surface unmodified.
#[async_trait]
pub trait WasmClient: Send + Sync {
    /// Bech32 address transactions are signed with
    fn sender(&self) -> &str;

    /// Fetch the sender's account, or `None` if it does not exist on chain yet
    async fn get_account(&self) -> ClientResult<Option<Account>>;

    /// Store a WASM blob on chain, returning the assigned code id
    async fn upload(&self, wasm: Vec<u8>, meta: UploadMeta) -> ClientResult<u64>;

    /// Instantiate a contract from an uploaded code id, returning its address
    async fn instantiate(
        &self,
        code_id: u64,
        msg: &Value,
        label: &str,
        admin: Option<&str>,
    ) -> ClientResult<String>;

    /// Execute a contract with a JSON action payload, returning the tx hash
    async fn execute(&self, contract: &str, msg: &Value) -> ClientResult<String>;

    /// Run a read-only smart query against a contract
    async fn query_smart(&self, contract: &str, msg: &Value) -> ClientResult<Value>;

    /// Migrate a contract to a new code id, returning the tx hash
    async fn migrate(&self, contract: &str, new_code_id: u64, msg: &Value)
        -> ClientResult<String>;

    /// Change the admin of a contract, returning the tx hash
    async fn update_admin(&self, contract: &str, new_admin: &str) -> ClientResult<String>;
}
