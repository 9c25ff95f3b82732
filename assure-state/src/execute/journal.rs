//! Staged token transfers.

use serde::{Deserialize, Serialize};

use assure_core::{Address, U256};

use crate::error::{StateError, StateResult};
use crate::external::{Ledger, LedgerError};

/// Direction of a staged transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// Escrow pulls from a caller via `transfer_from`.
    Pull,
    /// Escrow pays out via `transfer`.
    Payout,
}

/// One ledger movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub kind: TransferKind,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

/// Transfers staged by a handler, committed after the store mutation
/// succeeded.
///
/// Movements along the same edge are merged, so an operation that pays
/// deposit and stakes to one recipient commits a single transfer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferJournal {
    transfers: Vec<Transfer>,
}

impl TransferJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a pull of `amount` from `from` into `escrow`.
    pub fn pull(&mut self, from: Address, escrow: Address, amount: U256) -> StateResult<()> {
        self.stage(TransferKind::Pull, from, escrow, amount)
    }

    /// Stage a payout of `amount` from `escrow` to `to`.
    pub fn payout(&mut self, escrow: Address, to: Address, amount: U256) -> StateResult<()> {
        self.stage(TransferKind::Payout, escrow, to, amount)
    }

    fn stage(&mut self, kind: TransferKind, from: Address, to: Address, amount: U256) -> StateResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        if let Some(existing) = self
            .transfers
            .iter_mut()
            .find(|t| t.kind == kind && t.from == from && t.to == to)
        {
            existing.amount = existing
                .amount
                .checked_add(amount)
                .ok_or(StateError::ArithmeticOverflow)?;
            return Ok(());
        }
        self.transfers.push(Transfer {
            kind,
            from,
            to,
            amount,
        });
        Ok(())
    }

    /// Staged transfers, in staging order.
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Check if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Consume the journal.
    pub fn into_transfers(self) -> Vec<Transfer> {
        self.transfers
    }

    /// Apply every staged transfer to the ledger. `escrow` is the spender
    /// for pulls. Stops at the first failure.
    pub fn commit<L: Ledger + ?Sized>(&self, ledger: &mut L, escrow: &Address) -> StateResult<()> {
        for transfer in &self.transfers {
            let result = match transfer.kind {
                TransferKind::Pull => {
                    ledger.transfer_from(escrow, &transfer.from, &transfer.to, transfer.amount)
                }
                TransferKind::Payout => ledger.transfer(&transfer.from, &transfer.to, transfer.amount),
            };
            result.map_err(|err| ledger_error(err, &transfer.from))?;
        }
        Ok(())
    }
}

/// Map a ledger failure onto the protocol error for `owner`'s funds.
pub(crate) fn ledger_error(err: LedgerError, owner: &Address) -> StateError {
    match err {
        LedgerError::InsufficientBalance {
            available,
            required,
        } => StateError::InsufficientBalance {
            owner: *owner,
            available,
            required,
        },
        LedgerError::InsufficientAllowance {
            available,
            required,
        } => StateError::InsufficientAllowance {
            owner: *owner,
            available,
            required,
        },
        LedgerError::Unavailable(reason) => StateError::LedgerCallFailed(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::MemoryLedger;

    const ESCROW: Address = [0xEEu8; 20];
    const ALICE: Address = [1u8; 20];

    #[test]
    fn test_zero_amounts_not_staged() {
        let mut journal = TransferJournal::new();
        journal.payout(ESCROW, ALICE, U256::zero()).unwrap();
        assert!(journal.is_empty());
    }

    #[test]
    fn test_same_edge_coalesced() {
        let mut journal = TransferJournal::new();
        journal.payout(ESCROW, ALICE, U256::from(30u64)).unwrap();
        journal.payout(ESCROW, ALICE, U256::from(12u64)).unwrap();
        assert_eq!(journal.transfers().len(), 1);
        assert_eq!(journal.transfers()[0].amount, U256::from(42u64));
    }

    #[test]
    fn test_commit_pull_and_payout() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&ALICE, U256::from(100u64));
        ledger.approve(&ALICE, &ESCROW, U256::from(60u64)).unwrap();

        let mut journal = TransferJournal::new();
        journal.pull(ALICE, ESCROW, U256::from(60u64)).unwrap();
        journal.commit(&mut ledger, &ESCROW).unwrap();
        assert_eq!(ledger.balance_of(&ESCROW).unwrap(), U256::from(60u64));

        let mut journal = TransferJournal::new();
        journal.payout(ESCROW, ALICE, U256::from(25u64)).unwrap();
        journal.commit(&mut ledger, &ESCROW).unwrap();
        assert_eq!(ledger.balance_of(&ALICE).unwrap(), U256::from(65u64));
    }

    #[test]
    fn test_commit_maps_allowance_error() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&ALICE, U256::from(100u64));

        let mut journal = TransferJournal::new();
        journal.pull(ALICE, ESCROW, U256::from(10u64)).unwrap();
        let result = journal.commit(&mut ledger, &ESCROW);
        assert!(matches!(
            result,
            Err(StateError::InsufficientAllowance { owner, .. }) if owner == ALICE
        ));
    }
}
