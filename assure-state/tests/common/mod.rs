//! Shared test helpers for assure-state integration tests.

#![allow(dead_code)]

use assure_core::{Address, PoolId, PoolParams, PoolState, U256};
use assure_state::{
    Ledger, ManualClock, ManualPolicyOracle, MemoryLedger, PoolReader, Protocol,
    StaticExpertList,
};

/// Protocol wired to the in-memory collaborators.
pub type TestProtocol = Protocol<MemoryLedger, StaticExpertList, ManualPolicyOracle, ManualClock>;

pub const ESCROW: Address = [0xEE; 20];
pub const OWNER: Address = [0x0A; 20];
pub const CANDIDATE: Address = [0xC0; 20];
pub const POLICY: Address = [0xB0; 20];
pub const S1: Address = [0x11; 20];
pub const S2: Address = [0x22; 20];
pub const S3: Address = [0x33; 20];

/// Starting balance and escrow allowance of every funded account.
pub const FUNDS: u64 = 1_000_000;

pub fn amount(n: u64) -> U256 {
    U256::from(n)
}

/// Mint `FUNDS` to `who` and approve the escrow for all of it.
pub fn fund(ledger: &mut MemoryLedger, who: &Address) {
    ledger.mint(who, amount(FUNDS));
    ledger.approve(who, &ESCROW, amount(FUNDS)).unwrap();
}

/// Pool parameters: payout 100 per 5-tick period, min stake 10,
/// deposit 20, timeout 100, staking phase 1000.
pub fn pool_params(name: &str) -> PoolParams {
    PoolParams {
        candidate_contract: CANDIDATE,
        policy: POLICY,
        max_payout_per_period: amount(100),
        min_stake: amount(10),
        deposit: amount(20),
        bonus_expert_factor: 0,
        bonus_first_expert_factor: 0,
        pay_period_length: 5,
        min_stake_duration: 1_000,
        timeout_duration: 100,
        report_url: "https://reports.example/audit.pdf".into(),
        pool_name: name.into(),
        max_total_stake: amount(1_000),
    }
}

pub struct Harness {
    pub protocol: TestProtocol,
    pub clock: ManualClock,
}

impl Harness {
    /// Owner and three stakers funded, clock at tick 0.
    pub fn new() -> Self {
        let mut ledger = MemoryLedger::new();
        for who in [OWNER, S1, S2, S3] {
            fund(&mut ledger, &who);
        }
        let clock = ManualClock::new(0);
        let protocol = Protocol::new(
            ledger,
            StaticExpertList::default(),
            ManualPolicyOracle::new(),
            clock.clone(),
            ESCROW,
        );
        Self { protocol, clock }
    }

    pub fn create(&mut self, params: PoolParams) -> PoolId {
        self.protocol.create_pool(&OWNER, params).unwrap()
    }

    /// Pool with deposit 1000, so that any stake of at least 10 funds it.
    pub fn funded_pool(&mut self, name: &str) -> PoolId {
        let mut params = pool_params(name);
        params.deposit = amount(1_000);
        self.create(params)
    }

    pub fn tick(&self, ticks: u64) {
        self.clock.advance(ticks);
    }

    pub fn set_violated(&mut self, violated: bool) {
        self.protocol.policy_mut().set_violated(CANDIDATE, violated);
    }

    pub fn grant_expert(&mut self, who: Address) {
        self.protocol.experts_mut().grant(who);
    }

    pub fn balance(&self, who: &Address) -> U256 {
        self.protocol.ledger().balance_of(who).unwrap()
    }

    pub fn state(&self, pool_id: PoolId) -> PoolState {
        self.protocol.get_pool_state(pool_id)
    }

    /// Accounting and solvency invariants across every pool.
    pub fn assert_invariants(&self) {
        let store = self.protocol.store();
        let mut held = U256::zero();
        for pool_id in 0..store.pools_len() {
            let pool = store.get_pool(pool_id).unwrap();
            let stakes = store.stakes_of(pool_id);
            let staked = stakes.iter().fold(U256::zero(), |acc, (_, s)| acc + s.amount);
            let weighted = stakes
                .iter()
                .fold(U256::zero(), |acc, (_, s)| acc + s.weighted_amount);
            assert_eq!(staked, pool.total_staked, "pool {pool_id} total_staked");
            assert_eq!(weighted, pool.pool_weighted_size, "pool {pool_id} weighted size");
            assert_eq!(stakes.len() as u64, pool.stake_count, "pool {pool_id} stake_count");
            assert!(pool.pool_weighted_size >= pool.total_staked);
            assert!(pool.total_staked <= pool.max_total_stake);
            assert_ne!(pool.state, PoolState::None);
            held = held + pool.deposit + pool.total_staked;
        }
        assert_eq!(self.balance(&ESCROW), held, "escrow holds deposits and stakes");
    }
}
