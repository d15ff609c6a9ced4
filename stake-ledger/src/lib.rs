//! # Time-Locked Stake Ledger
//!
//! A staking ledger that locks deposits of a fungible asset for one of a
//! fixed set of **lock tiers**, accrues reward continuously in proportion to
//! stake size and elapsed time, and refuses to release principal before the
//! tier's lock has run out.
//!
//! ## Tiers
//!
//! | Lock     | Seconds    | Reward (APR) |
//! |----------|-----------:|:------------:|
//! | 1 month  |  2,419,200 | 10%          |
//! | 4 months |  9,676,800 | 20%          |
//! | 1 year   | 31,449,600 | 50%          |
//!
//! The table is configuration ([`StakingConfig`]) and can be replaced at
//! construction time.
//!
//! ## Quick start
//!
//! ```rust
//! use {
//!     solana_pubkey::Pubkey,
//!     timelock_stake_ledger::{
//!         constants::TIER_1_MONTH, Asset, InMemoryTokenBank, ManualClock, StakeLedger,
//!         StakingConfig,
//!     },
//! };
//!
//! let custody = Pubkey::new_from_array([0; 32]);
//! let alice = Pubkey::new_from_array([1; 32]);
//!
//! let mut bank = InMemoryTokenBank::new(custody);
//! bank.mint(Asset::Staking, &alice, 1_000).unwrap();
//! bank.approve(Asset::Staking, &alice, 1_000);
//!
//! let clock = ManualClock::new(1_700_000_000);
//! let mut ledger = StakeLedger::new(StakingConfig::default(), clock.clone(), bank).unwrap();
//!
//! ledger.stake(&alice, 1_000, TIER_1_MONTH).unwrap();
//! assert!(ledger.withdraw(&alice, 1_000).is_err());
//!
//! clock.advance(TIER_1_MONTH);
//! ledger.withdraw(&alice, 1_000).unwrap();
//! assert_eq!(ledger.transfers().balance_of(Asset::Staking, &alice), 1_000);
//! ```
//!
//! See [`rewards`] for the accrual formula and [`ledger`] for the operation
//! ordering that keeps every call all-or-nothing.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod instruction;
pub mod ledger;
pub mod rewards;
pub mod state;
pub mod transfer;


// Re-exports for convenience.
pub use {
    clock::{ManualClock, SystemClock, TimeSource},
    config::{StakingConfig, TierConfig},
    error::{ConfigError, StakingError, TransferError},
    event::StakeEvent,
    instruction::StakeInstruction,
    ledger::StakeLedger,
    state::{LedgerSnapshot, StakePosition},
    transfer::{Asset, AssetTransfer, InMemoryTokenBank},
};
