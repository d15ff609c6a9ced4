//! Tier table configuration for the stake ledger.

use {
    crate::{
        constants::{
            MAX_REWARD_RATE_BPS, REWARD_RATE_1_MONTH_BPS, REWARD_RATE_1_YEAR_BPS,
            REWARD_RATE_4_MONTH_BPS, TIER_1_MONTH, TIER_1_YEAR, TIER_4_MONTH,
        },
        error::ConfigError,
    },
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    std::{collections::HashSet, path::Path},
};

/// A single lock tier: how long principal stays locked and what it earns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct TierConfig {
    /// Lock duration in seconds. Also the key callers select the tier by.
    pub lock_seconds: u64,

    /// Annual reward rate, in basis points of principal.
    pub reward_rate_bps: u64,
}

/// Ledger configuration, fixed for the lifetime of a [`crate::StakeLedger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StakingConfig {
    /// Available lock tiers. Lock durations must be unique.
    pub tiers: Vec<TierConfig>,
}

impl StakingConfig {
    /// Look up the tier whose lock duration is exactly `lock_seconds`.
    pub fn tier(&self, lock_seconds: u64) -> Option<&TierConfig> {
        self.tiers.iter().find(|t| t.lock_seconds == lock_seconds)
    }

    /// Returns `true` if `lock_seconds` selects a configured tier.
    #[inline]
    pub fn is_valid_tier(&self, lock_seconds: u64) -> bool {
        self.tier(lock_seconds).is_some()
    }

    /// Check the tier table for problems that would break accrual or lock math.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::EmptyTierTable);
        }
        let mut seen = HashSet::with_capacity(self.tiers.len());
        for tier in &self.tiers {
            if tier.lock_seconds == 0 {
                return Err(ConfigError::ZeroLockDuration);
            }
            if i64::try_from(tier.lock_seconds).is_err() {
                return Err(ConfigError::LockDurationTooLong {
                    lock_seconds: tier.lock_seconds,
                });
            }
            if tier.reward_rate_bps > MAX_REWARD_RATE_BPS {
                return Err(ConfigError::RewardRateTooHigh {
                    rate_bps: tier.reward_rate_bps,
                    max_bps: MAX_REWARD_RATE_BPS,
                });
            }
            if !seen.insert(tier.lock_seconds) {
                return Err(ConfigError::DuplicateTier {
                    lock_seconds: tier.lock_seconds,
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON tier table.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON tier table from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for StakingConfig {
    /// The 1-month / 4-month / 1-year tier table.
    fn default() -> Self {
        Self {
            tiers: vec![
                TierConfig {
                    lock_seconds: TIER_1_MONTH,
                    reward_rate_bps: REWARD_RATE_1_MONTH_BPS,
                },
                TierConfig {
                    lock_seconds: TIER_4_MONTH,
                    reward_rate_bps: REWARD_RATE_4_MONTH_BPS,
                },
                TierConfig {
                    lock_seconds: TIER_1_YEAR,
                    reward_rate_bps: REWARD_RATE_1_YEAR_BPS,
                },
            ],
        }
    }
}
