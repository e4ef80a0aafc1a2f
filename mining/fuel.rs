//! Fuel ledger collaborator
//!
//! The engine only needs a balance query and a debit. Token accounting
//! itself lives outside this crate; [`InMemoryFuelLedger`] backs tests and
//! the operator binary.

use parking_lot::RwLock;
use rocker_core::Address;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FuelError {
    #[error("Insufficient balance: required {required}, available {available}")]
    Insufficient { required: u128, available: u128 },
}

pub trait FuelLedger: Send + Sync {
    fn balance_of(&self, account: &Address) -> u128;

    /// Removes `amount` from the account, all or nothing.
    fn debit(&self, account: &Address, amount: u128) -> Result<(), FuelError>;
}

#[derive(Debug, Default)]
pub struct InMemoryFuelLedger {
    balances: RwLock<HashMap<Address, u128>>,
}

impl InMemoryFuelLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&self, account: Address, amount: u128) {
        let mut balances = self.balances.write();
        let balance = balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Sum of all balances
    pub fn total_supply(&self) -> u128 {
        self.balances.read().values().fold(0u128, |acc, b| acc.saturating_add(*b))
    }
}

impl FuelLedger for InMemoryFuelLedger {
    fn balance_of(&self, account: &Address) -> u128 {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    fn debit(&self, account: &Address, amount: u128) -> Result<(), FuelError> {
        let mut balances = self.balances.write();
        let available = balances.get(account).copied().unwrap_or(0);
        if available < amount {
            return Err(FuelError::Insufficient { required: amount, available });
        }
        balances.insert(*account, available - amount);
        Ok(())
    }
}
