//! Per-operation fee table
//!
//! Gas limits are fixed per operation kind; the fee amount is computed from
//! the configured gas price as `floor(gas * price)` in the configured denom.

use crate::config::NetworkConfig;

/// A single fee coin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

/// Fee attached to a transaction: amount plus gas limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: u64,
}

/// Gas limits per operation kind
pub const GAS_UPLOAD: u64 = 1_500_000;
pub const GAS_INIT: u64 = 600_000;
pub const GAS_MIGRATE: u64 = 600_000;
pub const GAS_EXEC: u64 = 200_000;
pub const GAS_SEND: u64 = 80_000;
pub const GAS_CHANGE_ADMIN: u64 = 80_000;

/// Fees for every transaction kind the client can submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeTable {
    pub upload: StdFee,
    pub init: StdFee,
    pub migrate: StdFee,
    pub exec: StdFee,
    pub send: StdFee,
    pub change_admin: StdFee,
}

impl FeeTable {
    /// Build the fee table from network fee settings
    ///
    /// # Examples
    ///
    /// ```
    /// use cw20_kit::{FeeTable, NetworkConfig};
    ///
    /// let table = FeeTable::build(&NetworkConfig::coralnet());
    /// assert_eq!(table.upload.gas, 1_500_000);
    /// assert_eq!(table.upload.amount[0].denom, "ushell");
    /// ```
    #[must_use]
    pub fn build(config: &NetworkConfig) -> Self {
        let denom = &config.fee.denom;
        let price = config.fee.gas_price;

        Self {
            upload: std_fee(GAS_UPLOAD, denom, price),
            init: std_fee(GAS_INIT, denom, price),
            migrate: std_fee(GAS_MIGRATE, denom, price),
            exec: std_fee(GAS_EXEC, denom, price),
            send: std_fee(GAS_SEND, denom, price),
            change_admin: std_fee(GAS_CHANGE_ADMIN, denom, price),
        }
    }
}

fn std_fee(gas: u64, denom: &str, price: f64) -> StdFee {
    let amount = (gas as f64 * price).floor() as u128;
    StdFee {
        amount: vec![Coin {
            denom: denom.to_string(),
            amount,
        }],
        gas,
    }
}
