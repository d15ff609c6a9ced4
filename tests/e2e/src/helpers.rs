//! Shared test utilities for stake ledger end-to-end tests.
//!
//! Provides a simulated environment that owns:
//! - A manual clock shared with the ledger
//! - An in-memory bank holding both assets
//! - Depositor and reward-funder wallets

#![allow(clippy::arithmetic_side_effects)]

use {
    log::info,
    solana_clock::UnixTimestamp,
    solana_pubkey::Pubkey,
    std::sync::atomic::{AtomicU8, Ordering},
    timelock_stake_ledger::{
        Asset, InMemoryTokenBank, ManualClock, StakeLedger, StakingConfig, StakingError,
    },
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Base units per whole token.
pub const UNIT: u64 = 1_000_000_000;

/// Wall-clock instant the simulated ledger starts at.
pub const GENESIS: UnixTimestamp = 1_700_000_000;

/// Reward asset the funder seeds the reserve with.
pub const DEFAULT_RESERVE: u64 = 1_000_000 * UNIT;

/// Ledger type every scenario runs against.
pub type SimLedger = StakeLedger<ManualClock, InMemoryTokenBank>;

static NEXT_KEY: AtomicU8 = AtomicU8::new(1);

/// Distinct pubkey per call, stable within a process.
pub fn new_key() -> Pubkey {
    Pubkey::new_from_array([NEXT_KEY.fetch_add(1, Ordering::Relaxed); 32])
}

// ─────────────────────────────────────────────────────────────────────────────
// Simulated environment
// ─────────────────────────────────────────────────────────────────────────────

pub struct SimEnv {
    pub ledger: SimLedger,
    pub clock: ManualClock,
    pub custody: Pubkey,
    pub funder: Pubkey,
}

impl SimEnv {
    /// Default tiers, a funded reserve of `reserve`, and no depositors yet.
    pub fn new(reserve: u64) -> Self {
        Self::with_config(StakingConfig::default(), reserve)
    }

    pub fn with_config(config: StakingConfig, reserve: u64) -> Self {
        let custody = Pubkey::new_from_array([0; 32]);
        let funder = Pubkey::new_from_array([255; 32]);
        let mut bank = InMemoryTokenBank::new(custody);
        bank.mint(Asset::Reward, &funder, u64::MAX / 4).unwrap();
        bank.approve(Asset::Reward, &funder, u64::MAX);

        let clock = ManualClock::new(GENESIS);
        let mut ledger = StakeLedger::new(config, clock.clone(), bank).unwrap();
        if reserve > 0 {
            ledger.fund_reserves(&funder, reserve).unwrap();
        }
        info!("sim: ledger started at {GENESIS} with reserve {reserve}");

        Self {
            ledger,
            clock,
            custody,
            funder,
        }
    }

    /// Create a depositor holding `balance` staking tokens, all approved.
    pub fn new_depositor(&mut self, balance: u64) -> Pubkey {
        let depositor = new_key();
        let bank = self.ledger.transfers_mut();
        bank.mint(Asset::Staking, &depositor, balance).unwrap();
        bank.approve(Asset::Staking, &depositor, u64::MAX);
        depositor
    }

    /// Move the simulated clock forward by whole days.
    pub fn advance_days(&self, days: u64) -> UnixTimestamp {
        self.clock.advance(days * solana_clock::SECONDS_PER_DAY)
    }

    pub fn advance_seconds(&self, seconds: u64) -> UnixTimestamp {
        self.clock.advance(seconds)
    }

    pub fn staking_balance(&self, holder: &Pubkey) -> u64 {
        self.ledger.transfers().balance_of(Asset::Staking, holder)
    }

    pub fn reward_balance(&self, holder: &Pubkey) -> u64 {
        self.ledger.transfers().balance_of(Asset::Reward, holder)
    }

    /// Withdraw the depositor's whole principal.
    pub fn withdraw_all(&mut self, depositor: &Pubkey) -> Result<u64, StakingError> {
        let principal = self
            .ledger
            .position(depositor)
            .map_or(0, |position| position.principal);
        self.ledger.withdraw(depositor, principal)?;
        Ok(principal)
    }

    /// Panic unless custody balances match the ledger's own totals.
    pub fn assert_custody_consistent(&self) {
        assert_eq!(
            self.ledger.total_staked(),
            self.staking_balance(&self.custody),
            "custody staking balance diverged from total_staked"
        );
        assert_eq!(
            self.ledger.reward_reserve(),
            self.reward_balance(&self.custody),
            "custody reward balance diverged from reward_reserve"
        );
    }
}

/// Exact reward for `principal` over `elapsed` seconds at `rate_bps` APR,
/// using the same two floors the ledger applies.
pub fn expected_reward(principal: u64, rate_bps: u64, elapsed: u64) -> u64 {
    use timelock_stake_ledger::constants::{
        BPS_DENOMINATOR, REWARD_INDEX_PRECISION, SECONDS_PER_YEAR,
    };
    let index = rate_bps as u128 * elapsed as u128 * REWARD_INDEX_PRECISION
        / (BPS_DENOMINATOR as u128 * SECONDS_PER_YEAR as u128);
    (principal as u128 * index / REWARD_INDEX_PRECISION) as u64
}

/// Initialise logging for test output.
pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
