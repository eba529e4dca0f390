//! Mock WasmClient implementation for testing

#![cfg(test)]

use crate::client::{Account, ClientResult, UploadMeta, WasmClient};
use crate::error::ChainError;
use crate::test_fixtures::MOCK_SENDER;
use crate::token::{AllowanceInfo, Cw20ExecuteMsg, Cw20QueryMsg, InstantiateMsg, MinterResponse};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

const DEFAULT_PAGE_LIMIT: usize = 10;

/// Mock client for testing without a live node
///
/// Keeps an in-memory token ledger per instantiated contract and records the
/// last payloads sent, so tests can assert both semantics and wire shapes.
#[derive(Clone)]
pub struct MockClient {
    inner: Arc<Mutex<MockClientInner>>,
    sender: String,
}

struct MockClientInner {
    account: Option<Account>,
    uploads: Vec<Vec<u8>>,
    tokens: BTreeMap<String, TokenState>,
    tx_counter: u64,
    last_execute: Option<(String, Value)>,
    last_query: Option<(String, Value)>,
    last_txhash: Option<String>,
}

struct TokenState {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: u128,
    minter: Option<MinterResponse>,
    admin: Option<String>,
    code_id: u64,
    balances: BTreeMap<String, u128>,
    allowances: BTreeMap<(String, String), u128>,
}

impl MockClient {
    /// Create a mock with the default sender and an existing on-chain account
    #[must_use]
    pub fn new() -> Self {
        Self::with_sender(MOCK_SENDER)
    }

    /// Create a mock signing as `sender`
    #[must_use]
    pub fn with_sender(sender: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockClientInner {
                account: Some(Account {
                    address: sender.to_string(),
                    account_number: 1,
                    sequence: 0,
                }),
                uploads: Vec::new(),
                tokens: BTreeMap::new(),
                tx_counter: 0,
                last_execute: None,
                last_query: None,
                last_txhash: None,
            })),
            sender: sender.to_string(),
        }
    }

    /// Pretend the sender's account does not exist on chain yet
    #[must_use]
    pub fn without_account(self) -> Self {
        self.inner.lock().unwrap().account = None;
        self
    }

    /// Contract and payload of the last execute call
    pub fn last_execute(&self) -> Option<(String, Value)> {
        self.inner.lock().unwrap().last_execute.clone()
    }

    /// Contract and payload of the last smart query
    pub fn last_query(&self) -> Option<(String, Value)> {
        self.inner.lock().unwrap().last_query.clone()
    }

    /// Hash of the last committed transaction
    pub fn last_txhash(&self) -> Option<String> {
        self.inner.lock().unwrap().last_txhash.clone()
    }

    /// Current admin of a contract
    pub fn admin_of(&self, contract: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.tokens.get(contract).and_then(|t| t.admin.clone())
    }

    /// Current code id of a contract
    pub fn code_id_of(&self, contract: &str) -> Option<u64> {
        let inner = self.inner.lock().unwrap();
        inner.tokens.get(contract).map(|t| t.code_id)
    }

    /// Number of stored wasm blobs
    pub fn upload_count(&self) -> usize {
        self.inner.lock().unwrap().uploads.len()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

fn next_txhash(inner: &mut MockClientInner) -> String {
    inner.tx_counter += 1;
    let txhash = format!("{:064X}", inner.tx_counter);
    inner.last_txhash = Some(txhash.clone());
    txhash
}

fn tx_failed(code: u32, raw_log: impl Into<String>) -> ChainError {
    ChainError::TxFailed {
        code,
        raw_log: raw_log.into(),
    }
}

fn parse_amount(s: &str) -> Result<u128, ChainError> {
    s.parse().map_err(|_| tx_failed(2, format!("invalid amount `{s}`")))
}

fn debit(
    balances: &mut BTreeMap<String, u128>,
    from: &str,
    amount: u128,
) -> Result<(), ChainError> {
    let balance = balances.get(from).copied().unwrap_or_default();
    if balance < amount {
        return Err(tx_failed(
            5,
            format!("insufficient funds: balance {balance}, required {amount}"),
        ));
    }
    if balance == amount {
        balances.remove(from);
    } else {
        balances.insert(from.to_string(), balance - amount);
    }
    Ok(())
}

fn credit(balances: &mut BTreeMap<String, u128>, to: &str, amount: u128) {
    *balances.entry(to.to_string()).or_default() += amount;
}

fn spend_allowance(
    state: &mut TokenState,
    owner: &str,
    spender: &str,
    amount: u128,
) -> Result<(), ChainError> {
    let key = (owner.to_string(), spender.to_string());
    let allowance = state.allowances.get(&key).copied().unwrap_or_default();
    if allowance < amount {
        return Err(tx_failed(
            10,
            format!("no allowance: available {allowance}, required {amount}"),
        ));
    }
    if allowance == amount {
        state.allowances.remove(&key);
    } else {
        state.allowances.insert(key, allowance - amount);
    }
    Ok(())
}

#[async_trait]
impl WasmClient for MockClient {
    fn sender(&self) -> &str {
        &self.sender
    }

    async fn get_account(&self) -> ClientResult<Option<Account>> {
        Ok(self.inner.lock().unwrap().account.clone())
    }

    async fn upload(&self, wasm: Vec<u8>, _meta: UploadMeta) -> ClientResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        inner.uploads.push(wasm);
        next_txhash(&mut inner);
        Ok(inner.uploads.len() as u64)
    }

    async fn instantiate(
        &self,
        code_id: u64,
        msg: &Value,
        _label: &str,
        admin: Option<&str>,
    ) -> ClientResult<String> {
        let init: InstantiateMsg = serde_json::from_value(msg.clone())?;

        let mut balances = BTreeMap::new();
        let mut total_supply = 0u128;
        for coin in &init.initial_balances {
            let amount = parse_amount(&coin.amount)?;
            total_supply += amount;
            credit(&mut balances, &coin.address, amount);
        }

        let mut inner = self.inner.lock().unwrap();
        let address = format!("coral1contract{:03}", inner.tokens.len() + 1);
        inner.tokens.insert(
            address.clone(),
            TokenState {
                name: init.name,
                symbol: init.symbol,
                decimals: init.decimals,
                total_supply,
                minter: init.mint,
                admin: admin.map(str::to_string),
                code_id,
                balances,
                allowances: BTreeMap::new(),
            },
        );
        next_txhash(&mut inner);
        Ok(address)
    }

    async fn execute(&self, contract: &str, msg: &Value) -> ClientResult<String> {
        let action: Cw20ExecuteMsg = serde_json::from_value(msg.clone())
            .map_err(|e| tx_failed(2, format!("unknown execute message: {e}")))?;

        let mut inner = self.inner.lock().unwrap();
        inner.last_execute = Some((contract.to_string(), msg.clone()));

        let sender = self.sender.clone();
        let state = inner
            .tokens
            .get_mut(contract)
            .ok_or_else(|| tx_failed(22, format!("contract {contract} not found")))?;

        match action {
            Cw20ExecuteMsg::Mint { recipient, amount } => {
                let amount = parse_amount(&amount)?;
                let minter = state.minter.as_ref().ok_or_else(|| {
                    tx_failed(1, "minting is not enabled for this token")
                })?;
                if minter.minter != sender {
                    return Err(tx_failed(1, "unauthorized: sender is not the minter"));
                }
                if let Some(cap) = &minter.cap {
                    let cap = parse_amount(cap)?;
                    if state.total_supply + amount > cap {
                        return Err(tx_failed(1, "minting would exceed the cap"));
                    }
                }
                state.total_supply += amount;
                credit(&mut state.balances, &recipient, amount);
            }
            Cw20ExecuteMsg::Transfer { recipient, amount } => {
                let amount = parse_amount(&amount)?;
                debit(&mut state.balances, &sender, amount)?;
                credit(&mut state.balances, &recipient, amount);
            }
            Cw20ExecuteMsg::Burn { amount } => {
                let amount = parse_amount(&amount)?;
                debit(&mut state.balances, &sender, amount)?;
                state.total_supply -= amount;
            }
            Cw20ExecuteMsg::Send {
                contract: recipient,
                amount,
                msg: _,
            } => {
                let amount = parse_amount(&amount)?;
                debit(&mut state.balances, &sender, amount)?;
                credit(&mut state.balances, &recipient, amount);
            }
            Cw20ExecuteMsg::IncreaseAllowance { spender, amount } => {
                let amount = parse_amount(&amount)?;
                *state
                    .allowances
                    .entry((sender.clone(), spender))
                    .or_default() += amount;
            }
            Cw20ExecuteMsg::DecreaseAllowance { spender, amount } => {
                let amount = parse_amount(&amount)?;
                let key = (sender.clone(), spender);
                let current = state.allowances.get(&key).copied().unwrap_or_default();
                let remaining = current.saturating_sub(amount);
                if remaining == 0 {
                    state.allowances.remove(&key);
                } else {
                    state.allowances.insert(key, remaining);
                }
            }
            Cw20ExecuteMsg::TransferFrom {
                owner,
                recipient,
                amount,
            } => {
                let amount = parse_amount(&amount)?;
                spend_allowance(state, &owner, &sender, amount)?;
                debit(&mut state.balances, &owner, amount)?;
                credit(&mut state.balances, &recipient, amount);
            }
            Cw20ExecuteMsg::SendFrom {
                owner,
                contract: recipient,
                amount,
                msg: _,
            } => {
                let amount = parse_amount(&amount)?;
                spend_allowance(state, &owner, &sender, amount)?;
                debit(&mut state.balances, &owner, amount)?;
                credit(&mut state.balances, &recipient, amount);
            }
            Cw20ExecuteMsg::BurnFrom { owner, amount } => {
                let amount = parse_amount(&amount)?;
                spend_allowance(state, &owner, &sender, amount)?;
                debit(&mut state.balances, &owner, amount)?;
                state.total_supply -= amount;
            }
        }

        Ok(next_txhash(&mut inner))
    }

    async fn query_smart(&self, contract: &str, msg: &Value) -> ClientResult<Value> {
        let query: Cw20QueryMsg = serde_json::from_value(msg.clone())?;

        let mut inner = self.inner.lock().unwrap();
        inner.last_query = Some((contract.to_string(), msg.clone()));

        let state = inner.tokens.get(contract).ok_or_else(|| ChainError::Node {
            status: 404,
            body: format!("contract {contract} not found"),
        })?;

        let response = match query {
            Cw20QueryMsg::Balance { address } => {
                let balance = state.balances.get(&address).copied().unwrap_or_default();
                json!({ "balance": balance.to_string() })
            }
            Cw20QueryMsg::Allowance { owner, spender } => {
                let allowance = state
                    .allowances
                    .get(&(owner, spender))
                    .copied()
                    .unwrap_or_default();
                json!({ "allowance": allowance.to_string() })
            }
            Cw20QueryMsg::TokenInfo {} => json!({
                "name": state.name,
                "symbol": state.symbol,
                "decimals": state.decimals,
                "total_supply": state.total_supply.to_string(),
            }),
            Cw20QueryMsg::Minter {} => match &state.minter {
                Some(minter) => serde_json::to_value(minter)?,
                None => Value::Null,
            },
            Cw20QueryMsg::AllAccounts { start_after, limit } => {
                let limit = limit.map_or(DEFAULT_PAGE_LIMIT, |l| l as usize);
                let accounts: Vec<&String> = state
                    .balances
                    .keys()
                    .filter(|addr| match &start_after {
                        Some(bound) => addr.as_str() > bound.as_str(),
                        None => true,
                    })
                    .take(limit)
                    .collect();
                json!({ "accounts": accounts })
            }
            Cw20QueryMsg::AllAllowances {
                owner,
                start_after,
                limit,
            } => {
                let limit = limit.map_or(DEFAULT_PAGE_LIMIT, |l| l as usize);
                let allowances: Vec<AllowanceInfo> = state
                    .allowances
                    .iter()
                    .filter(|((o, spender), _)| {
                        *o == owner
                            && match &start_after {
                                Some(bound) => spender.as_str() > bound.as_str(),
                                None => true,
                            }
                    })
                    .take(limit)
                    .map(|((_, spender), amount)| AllowanceInfo {
                        spender: spender.clone(),
                        allowance: amount.to_string(),
                    })
                    .collect();
                json!({ "allowances": allowances })
            }
        };

        Ok(response)
    }

    async fn migrate(
        &self,
        contract: &str,
        new_code_id: u64,
        _msg: &Value,
    ) -> ClientResult<String> {
        let mut inner = self.inner.lock().unwrap();
        let sender = self.sender.clone();
        let state = inner
            .tokens
            .get_mut(contract)
            .ok_or_else(|| tx_failed(22, format!("contract {contract} not found")))?;
        if state.admin.as_deref() != Some(sender.as_str()) {
            return Err(tx_failed(1, "unauthorized: sender is not the admin"));
        }
        state.code_id = new_code_id;
        Ok(next_txhash(&mut inner))
    }

    async fn update_admin(&self, contract: &str, new_admin: &str) -> ClientResult<String> {
        let mut inner = self.inner.lock().unwrap();
        let sender = self.sender.clone();
        let state = inner
            .tokens
            .get_mut(contract)
            .ok_or_else(|| tx_failed(22, format!("contract {contract} not found")))?;
        if state.admin.as_deref() != Some(sender.as_str()) {
            return Err(tx_failed(1, "unauthorized: sender is not the admin"));
        }
        state.admin = Some(new_admin.to_string());
        Ok(next_txhash(&mut inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{ALICE, BOB};

    fn init_msg() -> Value {
        json!({
            "name": "Mock Token",
            "symbol": "MOCK",
            "decimals": 6,
            "initial_balances": [
                { "address": ALICE, "amount": "100" }
            ],
            "mint": { "minter": MOCK_SENDER }
        })
    }

    #[tokio::test]
    async fn test_upload_assigns_sequential_code_ids() {
        let client = MockClient::new();
        let meta = UploadMeta::default();
        assert_eq!(client.upload(vec![0], meta.clone()).await.unwrap(), 1);
        assert_eq!(client.upload(vec![1], meta).await.unwrap(), 2);
        assert_eq!(client.upload_count(), 2);
    }

    #[tokio::test]
    async fn test_mint_requires_minter() {
        let client = MockClient::with_sender(BOB);
        let contract = client
            .instantiate(1, &init_msg(), "MOCK", None)
            .await
            .unwrap();

        let mint = json!({ "mint": { "recipient": BOB, "amount": "5" } });
        let result = client.execute(&contract, &mint).await;
        assert!(matches!(result, Err(ChainError::TxFailed { code: 1, .. })));
    }

    #[tokio::test]
    async fn test_mint_cap_is_enforced() {
        let client = MockClient::new();
        let msg = json!({
            "name": "Capped",
            "symbol": "CAP",
            "decimals": 0,
            "initial_balances": [],
            "mint": { "minter": MOCK_SENDER, "cap": "10" }
        });
        let contract = client.instantiate(1, &msg, "CAP", None).await.unwrap();

        let ok = json!({ "mint": { "recipient": ALICE, "amount": "10" } });
        client.execute(&contract, &ok).await.unwrap();

        let too_much = json!({ "mint": { "recipient": ALICE, "amount": "1" } });
        let result = client.execute(&contract, &too_much).await;
        assert!(matches!(result, Err(ChainError::TxFailed { code: 1, .. })));
    }

    #[tokio::test]
    async fn test_admin_surface() {
        let client = MockClient::new();
        let contract = client
            .instantiate(1, &init_msg(), "MOCK", Some(MOCK_SENDER))
            .await
            .unwrap();
        assert_eq!(client.admin_of(&contract).as_deref(), Some(MOCK_SENDER));

        client.migrate(&contract, 7, &json!({})).await.unwrap();
        assert_eq!(client.code_id_of(&contract), Some(7));

        client.update_admin(&contract, ALICE).await.unwrap();
        assert_eq!(client.admin_of(&contract).as_deref(), Some(ALICE));

        // The previous admin lost its rights
        let result = client.migrate(&contract, 8, &json!({})).await;
        assert!(matches!(result, Err(ChainError::TxFailed { code: 1, .. })));
    }

    #[tokio::test]
    async fn test_without_account() {
        let client = MockClient::new().without_account();
        assert!(client.get_account().await.unwrap().is_none());
    }
}
