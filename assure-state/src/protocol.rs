//! Protocol façade.
//!
//! [`Protocol`] owns the pool store and the collaborators, and runs each
//! mutating call atomically: the executor works on a clone of the store,
//! the staged transfers are committed to the ledger, and only then does
//! the clone replace the canonical store.

use assure_core::{
    address_to_hex, Address, Operation, OperationKind, Pool, PoolId, PoolParams, PoolState,
    SignedOperation, Stake, Tick, U256,
};

use crate::config::ProtocolConfig;
use crate::error::{StateError, StateResult};
use crate::execute::{
    apply_operation, apply_signed_operation, ExecutionContext, OperationReceipt, TransferJournal,
};
use crate::external::{Clock, ExpertOracle, Ledger, PolicyOracle};
use crate::payout::{owed_interest, period_payout};
use crate::store::{MemoryPoolStore, PoolReader};

/// The staking protocol.
///
/// Calls take `&mut self`, so one call completes before the next begins.
/// `now` is read from the clock once per call.
#[derive(Debug)]
pub struct Protocol<L, E, P, C> {
    store: MemoryPoolStore,
    ledger: L,
    experts: E,
    policy: P,
    clock: C,
    escrow: Address,
    config: ProtocolConfig,
}

macro_rules! pool_getters {
    ($($(#[$doc:meta])* $name:ident => $field:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, pool_id: PoolId) -> StateResult<$ty> {
                Ok(self.get_pool(pool_id)?.$field.clone())
            }
        )*
    };
}

impl<L, E, P, C> Protocol<L, E, P, C>
where
    L: Ledger,
    E: ExpertOracle,
    P: PolicyOracle,
    C: Clock,
{
    /// Create a protocol with an empty store. `escrow` is the ledger
    /// account holding every deposit and stake.
    pub fn new(ledger: L, experts: E, policy: P, clock: C, escrow: Address) -> Self {
        Self {
            store: MemoryPoolStore::new(),
            ledger,
            experts,
            policy,
            clock,
            escrow,
            config: ProtocolConfig::default(),
        }
    }

    /// Replace the store, e.g. with a loaded snapshot.
    pub fn with_store(mut self, store: MemoryPoolStore) -> Self {
        self.store = store;
        self
    }

    /// Replace the creation limits.
    pub fn with_config(mut self, config: ProtocolConfig) -> Self {
        self.config = config;
        self
    }

    // === Mutating Operations ===

    /// Create a pool owned by `caller`, pulling the initial deposit.
    pub fn create_pool(&mut self, caller: &Address, params: PoolParams) -> StateResult<PoolId> {
        let receipt = self.apply(caller, &Operation::CreatePool(params))?;
        Ok(receipt.pool_id)
    }

    /// Stake `amount` into a pool.
    pub fn stake_funds(
        &mut self,
        caller: &Address,
        pool_id: PoolId,
        amount: U256,
    ) -> StateResult<OperationReceipt> {
        self.apply(caller, &Operation::StakeFunds { pool_id, amount })
    }

    /// Withdraw the caller's whole stake.
    pub fn withdraw_stake(&mut self, caller: &Address, pool_id: PoolId) -> StateResult<OperationReceipt> {
        self.apply(caller, &Operation::WithdrawStake { pool_id })
    }

    /// Add to the owner deposit.
    pub fn deposit_funds(
        &mut self,
        caller: &Address,
        pool_id: PoolId,
        amount: U256,
    ) -> StateResult<OperationReceipt> {
        self.apply(caller, &Operation::DepositFunds { pool_id, amount })
    }

    /// Withdraw the owner deposit and cancel the pool.
    pub fn withdraw_deposit(&mut self, caller: &Address, pool_id: PoolId) -> StateResult<OperationReceipt> {
        self.apply(caller, &Operation::WithdrawDeposit { pool_id })
    }

    /// Collect the caller's accrued interest.
    pub fn withdraw_interest(&mut self, caller: &Address, pool_id: PoolId) -> StateResult<OperationReceipt> {
        self.apply(caller, &Operation::WithdrawInterest { pool_id })
    }

    /// Owner claim after violation or expiry.
    pub fn withdraw_claim(&mut self, caller: &Address, pool_id: PoolId) -> StateResult<OperationReceipt> {
        self.apply(caller, &Operation::WithdrawClaim { pool_id })
    }

    /// Persist a pending violation.
    pub fn check_policy(&mut self, caller: &Address, pool_id: PoolId) -> StateResult<OperationReceipt> {
        self.apply(caller, &Operation::CheckPolicy { pool_id })
    }

    /// Apply any operation on behalf of `caller`.
    pub fn apply(&mut self, caller: &Address, op: &Operation) -> StateResult<OperationReceipt> {
        tracing::debug!(
            operation = %op.kind(),
            caller = %address_to_hex(caller),
            "applying operation"
        );
        self.run(op.kind(), |store, ctx| apply_operation(store, ctx, caller, op))
    }

    /// Apply a signed operation. The caller is the envelope's signer.
    pub fn apply_signed(&mut self, signed: &SignedOperation) -> StateResult<OperationReceipt> {
        tracing::debug!(
            operation = %signed.op.kind(),
            caller = %address_to_hex(&signed.caller()),
            nonce = signed.nonce,
            "applying signed operation"
        );
        self.run(signed.op.kind(), |store, ctx| apply_signed_operation(store, ctx, signed))
    }

    fn run<F>(&mut self, kind: OperationKind, f: F) -> StateResult<OperationReceipt>
    where
        F: FnOnce(
            &mut MemoryPoolStore,
            &ExecutionContext<'_>,
        ) -> StateResult<(OperationReceipt, TransferJournal)>,
    {
        let now = self.clock.now();
        let mut staged = self.store.clone();

        let outcome = {
            let ctx = ExecutionContext::new(
                now,
                self.escrow,
                &self.config,
                &self.ledger,
                &self.experts,
                &self.policy,
            );
            f(&mut staged, &ctx)
        };

        let (receipt, journal) = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(operation = %kind, kind = %err.kind(), error = %err, "operation rejected");
                return Err(err);
            }
        };

        if let Err(err) = journal.commit(&mut self.ledger, &self.escrow) {
            tracing::warn!(operation = %kind, error = %err, "transfer failed, operation rolled back");
            return Err(err);
        }
        self.store = staged;

        if receipt.previous_state != receipt.state {
            tracing::info!(
                operation = %kind,
                pool_id = receipt.pool_id,
                from = %receipt.previous_state,
                to = %receipt.state,
                "operation applied"
            );
        } else {
            tracing::debug!(operation = %kind, pool_id = receipt.pool_id, "operation applied");
        }
        Ok(receipt)
    }

    // === Pool Accessors ===

    /// Get a pool by id.
    pub fn get_pool(&self, pool_id: PoolId) -> StateResult<&Pool> {
        self.store
            .get_pool(pool_id)
            .ok_or(StateError::PoolNotFound { pool_id })
    }

    /// Stored state of a pool; `PoolState::None` for an unknown id.
    pub fn get_pool_state(&self, pool_id: PoolId) -> PoolState {
        self.store
            .get_pool(pool_id)
            .map(|p| p.state)
            .unwrap_or(PoolState::None)
    }

    /// Number of pools ever created.
    pub fn get_pools_length(&self) -> u64 {
        self.store.pools_len()
    }

    /// Pool id registered under `name`.
    pub fn get_pool_index(&self, name: &str) -> Option<PoolId> {
        self.store.pool_index(name)
    }

    pool_getters! {
        /// Monitored contract.
        get_pool_candidate_contract => candidate_contract: Address;
        /// Policy checked against the monitored contract.
        get_pool_policy => policy: Address;
        /// Pool owner.
        get_pool_owner => owner: Address;
        /// Payout split across all stakers per period.
        get_pool_max_payout_per_period => max_payout_per_period: U256;
        /// Minimum total stake for the pool to run.
        get_pool_min_stake => min_stake: U256;
        /// Remaining owner deposit.
        get_pool_deposit => deposit: U256;
        /// Expert bonus (basis points).
        get_pool_bonus_expert_factor => bonus_expert_factor: u32;
        /// First-expert bonus (basis points).
        get_pool_bonus_first_expert_factor => bonus_first_expert_factor: u32;
        /// First expert to stake, if any.
        get_pool_first_expert_staker => first_expert_staker: Option<Address>;
        /// Ticks per pay period.
        get_pool_pay_period_length => pay_period_length: Tick;
        /// Ticks the staking phase lasts.
        get_pool_min_stake_duration => min_stake_duration: Tick;
        /// Ticks an unfunded pool waits before cancelling.
        get_pool_timeout_duration => timeout_duration: Tick;
        /// Tick of the last stamped transition.
        get_pool_time_of_last_state_change => time_of_last_state_change: Tick;
        /// Audit report location.
        get_pool_url_of_report => url_of_report: String;
        /// Sum of stake amounts.
        get_pool_total_staked => total_staked: U256;
        /// Sum of weighted stake amounts.
        get_pool_weighted_size => pool_weighted_size: U256;
        /// Open positions.
        get_pool_stake_count => stake_count: u64;
        /// Unique pool name.
        get_pool_name => name: String;
        /// Stake cap.
        get_pool_max_total_stake => max_total_stake: U256;
    }

    // === Stake Accessors ===

    /// One staker's position.
    pub fn get_stake(&self, pool_id: PoolId, staker: &Address) -> StateResult<&Stake> {
        self.get_pool(pool_id)?;
        self.store
            .get_stake(pool_id, staker)
            .ok_or(StateError::StakeNotFound {
                pool_id,
                staker: *staker,
            })
    }

    /// Interest owed to `staker` now, over all elapsed periods. Not capped
    /// by the deposit.
    pub fn compute_payout(&self, pool_id: PoolId, staker: &Address) -> StateResult<U256> {
        let pool = self.get_pool(pool_id)?;
        let stakes = self.store.stakes_of(pool_id);
        owed_interest(pool, &stakes, staker, self.clock.now())
    }

    /// `staker`'s share of a single period's payout.
    pub fn compute_period_payout(&self, pool_id: PoolId, staker: &Address) -> StateResult<U256> {
        let pool = self.get_pool(pool_id)?;
        let stakes = self.store.stakes_of(pool_id);
        period_payout(pool, &stakes, staker)
    }

    /// Ask the expert registry about `who`.
    pub fn is_expert(&self, who: &Address) -> StateResult<bool> {
        self.experts
            .is_expert(who)
            .map_err(|e| StateError::ExpertOracleFailed(e.0))
    }

    /// Next envelope nonce for `signer`.
    pub fn nonce(&self, signer: &Address) -> u64 {
        self.store.nonce(signer)
    }

    // === Collaborators ===

    /// Canonical pool store.
    pub fn store(&self) -> &MemoryPoolStore {
        &self.store
    }

    /// Escrow account.
    pub fn escrow(&self) -> &Address {
        &self.escrow
    }

    /// Creation limits.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Token ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Token ledger, mutably. Outside calls only (faucets, approvals).
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Expert registry.
    pub fn experts(&self) -> &E {
        &self.experts
    }

    /// Expert registry, mutably.
    pub fn experts_mut(&mut self) -> &mut E {
        &mut self.experts
    }

    /// Policy oracle.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Policy oracle, mutably.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
