//! Error types for the stake ledger and its collaborators.

use {
    num_derive::{FromPrimitive, ToPrimitive},
    solana_pubkey::Pubkey,
    thiserror::Error,
};

/// Failure reasons surfaced by [`crate::StakeLedger`] operations.
///
/// Every variant is recoverable by the caller; the ledger state is left
/// untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum StakingError {
    #[error("Invalid lock tier: duration does not match any configured tier")]
    InvalidTier = 0,

    #[error("Asset transfer was rejected by the transfer service")]
    TransferFailed,

    #[error("Withdrawal amount is zero or exceeds the staked principal")]
    InsufficientStake,

    #[error("CANT WITHDRAW: lock period has not yet expired")]
    LockNotExpired,

    #[error("Reward reserve cannot cover the amount owed")]
    InsufficientReserves,

    #[error("No rewards available to claim")]
    NothingToClaim,

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Arithmetic overflow in ledger accounting")]
    ArithmeticOverflow,

    #[error("Instruction data is invalid or could not be decoded")]
    InvalidInstructionData,
}

impl StakingError {
    /// Stable numeric code for this error, suitable for wire protocols.
    pub fn code(self) -> u32 {
        num_traits::ToPrimitive::to_u32(&self).unwrap_or(u32::MAX)
    }
}

/// Failure reported by an [`crate::AssetTransfer`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient balance: holder has {available}, needs {required}")]
    InsufficientBalance { available: u64, required: u64 },

    #[error("insufficient allowance: approved {approved}, needs {required}")]
    InsufficientAllowance { approved: u64, required: u64 },

    #[error("balance overflow")]
    Overflow,

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// A tier table, configuration file or snapshot that cannot be used to
/// build a ledger.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("tier table is empty")]
    EmptyTierTable,

    #[error("tier lock duration must be greater than zero")]
    ZeroLockDuration,

    #[error("tier lock duration {lock_seconds}s does not fit a unix timestamp")]
    LockDurationTooLong { lock_seconds: u64 },

    #[error("duplicate tier lock duration {lock_seconds}s")]
    DuplicateTier { lock_seconds: u64 },

    #[error("reward rate {rate_bps} bps exceeds maximum {max_bps} bps")]
    RewardRateTooHigh { rate_bps: u64, max_bps: u64 },

    #[error("snapshot position uses lock duration {lock_seconds}s, which is not a configured tier")]
    UnknownPositionTier { lock_seconds: u64 },

    #[error("snapshot total_staked {recorded} does not match position principal sum {computed}")]
    SnapshotTotalMismatch { recorded: u64, computed: u64 },

    #[error("snapshot position principals overflow u64")]
    SnapshotPrincipalOverflow,

    #[error("snapshot lists depositor {depositor:?} more than once")]
    DuplicatePosition { depositor: Pubkey },

    #[error("tier {lock_seconds}s was recorded at {recorded_bps} bps but is configured at {configured_bps} bps")]
    TierRateChanged {
        lock_seconds: u64,
        recorded_bps: u64,
        configured_bps: u64,
    },

    #[error("failed to parse staking config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read staking config: {0}")]
    Io(#[from] std::io::Error),
}
