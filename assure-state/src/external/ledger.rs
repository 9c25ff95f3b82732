//! Token ledger.

use std::collections::BTreeMap;

use thiserror::Error;

use assure_core::{Address, U256};

/// Errors a ledger can report.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Holder balance below the transfer amount.
    #[error("insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: U256, required: U256 },

    /// Spender allowance below the transfer amount.
    #[error("insufficient allowance: available {available}, required {required}")]
    InsufficientAllowance { available: U256, required: U256 },

    /// The ledger could not be reached or refused the call.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Fungible token ledger, shaped after the usual token interface.
///
/// The protocol holds funds in its own escrow account: it pulls from
/// callers with `transfer_from` (as spender) and pays out with `transfer`.
pub trait Ledger {
    /// Move `amount` from `from` to `to`, authorized by `from` itself.
    fn transfer(&mut self, from: &Address, to: &Address, amount: U256) -> Result<(), LedgerError>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Set `spender`'s allowance over `owner`'s balance.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: U256) -> Result<(), LedgerError>;

    /// Balance of `holder`.
    fn balance_of(&self, holder: &Address) -> Result<U256, LedgerError>;

    /// Remaining allowance of `spender` over `owner`'s balance.
    fn allowance(&self, owner: &Address, spender: &Address) -> Result<U256, LedgerError>;
}

/// In-memory ledger.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<(Address, Address), U256>,
    total_supply: U256,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tokens out of thin air. Devnet and tests only.
    pub fn mint(&mut self, to: &Address, amount: U256) {
        let balance = self.balances.entry(*to).or_insert_with(U256::zero);
        *balance = balance.saturating_add(amount);
        self.total_supply = self.total_supply.saturating_add(amount);
    }

    /// Sum of all minted tokens.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    fn balance(&self, holder: &Address) -> U256 {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    fn move_balance(&mut self, from: &Address, to: &Address, amount: U256) -> Result<(), LedgerError> {
        let available = self.balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        self.balances.insert(*from, available - amount);
        let receiver = self.balances.entry(*to).or_insert_with(U256::zero);
        *receiver = *receiver + amount;
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn transfer(&mut self, from: &Address, to: &Address, amount: U256) -> Result<(), LedgerError> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let allowed = self
            .allowances
            .get(&(*from, *spender))
            .copied()
            .unwrap_or_default();
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                available: allowed,
                required: amount,
            });
        }
        self.move_balance(from, to, amount)?;
        self.allowances.insert((*from, *spender), allowed - amount);
        Ok(())
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: U256) -> Result<(), LedgerError> {
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    fn balance_of(&self, holder: &Address) -> Result<U256, LedgerError> {
        Ok(self.balance(holder))
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Result<U256, LedgerError> {
        Ok(self
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default())
    }
}
