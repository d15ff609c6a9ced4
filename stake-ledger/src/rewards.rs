//! Reward accrual math.
//!
//! Each tier owns a cumulative *reward-per-token index* that grows linearly
//! with time since the ledger's genesis:
//!
//! ```text
//! index(tier, t) = rate_bps × (t − genesis) × PRECISION / (BPS_DENOMINATOR × SECONDS_PER_YEAR)
//! ```
//!
//! A position records the index of its tier at the last settlement
//! (`reward_per_token_paid`). The reward owed since then is
//!
//! ```text
//! pending = principal × (index(tier, now) − reward_per_token_paid) / PRECISION
//! ```
//!
//! All arithmetic is integer with `u128` intermediates. Both divisions floor,
//! so rounding always favours the reserve: a depositor may be underpaid by
//! less than one base unit per settlement, never overpaid.

use {
    crate::{
        constants::{BPS_DENOMINATOR, REWARD_INDEX_PRECISION, SECONDS_PER_YEAR},
        error::StakingError,
    },
    solana_clock::UnixTimestamp,
};

/// Seconds elapsed from `from` to `to`, or zero if `to` is not after `from`.
#[inline]
pub fn elapsed_seconds(from: UnixTimestamp, to: UnixTimestamp) -> u64 {
    u64::try_from(to.saturating_sub(from)).unwrap_or(0)
}

/// Reward index growth for `elapsed` seconds at `reward_rate_bps` per year.
pub fn reward_per_token(reward_rate_bps: u64, elapsed: u64) -> Result<u128, StakingError> {
    let denom = (BPS_DENOMINATOR as u128)
        .checked_mul(SECONDS_PER_YEAR as u128)
        .ok_or(StakingError::ArithmeticOverflow)?;
    (reward_rate_bps as u128)
        .checked_mul(elapsed as u128)
        .and_then(|v| v.checked_mul(REWARD_INDEX_PRECISION))
        .and_then(|v| v.checked_div(denom))
        .ok_or(StakingError::ArithmeticOverflow)
}

/// Value of a tier's reward index at `now` for a ledger created at `genesis`.
pub fn reward_index_at(
    reward_rate_bps: u64,
    genesis: UnixTimestamp,
    now: UnixTimestamp,
) -> Result<u128, StakingError> {
    reward_per_token(reward_rate_bps, elapsed_seconds(genesis, now))
}

/// Reward owed to `principal` for an index move from `index_paid` to `index_now`.
///
/// An index that has not advanced (or a clock that moved backwards) accrues
/// nothing.
pub fn pending_reward(
    principal: u64,
    index_now: u128,
    index_paid: u128,
) -> Result<u64, StakingError> {
    let delta = index_now.saturating_sub(index_paid);
    let reward = (principal as u128)
        .checked_mul(delta)
        .ok_or(StakingError::ArithmeticOverflow)?
        / REWARD_INDEX_PRECISION;
    u64::try_from(reward).map_err(|_| StakingError::ArithmeticOverflow)
}
