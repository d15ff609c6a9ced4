//! Lock tier definitions and accrual constants.
//!
//! Defines the default lock durations, their annual reward rates, and the
//! fixed-point scales used by the accrual math in [`crate::rewards`].

use solana_clock::SECONDS_PER_DAY;

/// Seconds in a 365-day year, the period that `reward_rate_bps` is quoted over.
pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Basis points denominator (10_000 bps = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Fixed-point scale of the per-token reward index.
pub const REWARD_INDEX_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Upper bound accepted for a tier's annual reward rate (1000% APR).
pub const MAX_REWARD_RATE_BPS: u64 = 100_000;

// ---------------------------------------------------------------------------
// Tier lock durations (in seconds)
// ---------------------------------------------------------------------------

/// 4 weeks.
pub const TIER_1_MONTH: u64 = 28 * SECONDS_PER_DAY;

/// 16 weeks.
pub const TIER_4_MONTH: u64 = 112 * SECONDS_PER_DAY;

/// 52 weeks.
pub const TIER_1_YEAR: u64 = 364 * SECONDS_PER_DAY;

// ---------------------------------------------------------------------------
// Reward rates: annual rate of principal, in basis points.
// ---------------------------------------------------------------------------

/// 1-month: 10% APR.
pub const REWARD_RATE_1_MONTH_BPS: u64 = 1_000;

/// 4-month: 20% APR.
pub const REWARD_RATE_4_MONTH_BPS: u64 = 2_000;

/// 1-year: 50% APR.
pub const REWARD_RATE_1_YEAR_BPS: u64 = 5_000;

/// Returns the default reward rate for the given lock duration.
pub fn default_reward_rate_bps(lock_seconds: u64) -> Option<u64> {
    match lock_seconds {
        TIER_1_MONTH => Some(REWARD_RATE_1_MONTH_BPS),
        TIER_4_MONTH => Some(REWARD_RATE_4_MONTH_BPS),
        TIER_1_YEAR => Some(REWARD_RATE_1_YEAR_BPS),
        _ => None,
    }
}
