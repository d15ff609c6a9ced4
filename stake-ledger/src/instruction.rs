//! Instruction definitions for driving the ledger from serialised requests.
//!
//! Instructions are encoded with `bincode` (fixed-width integers), the same
//! encoding the host's built-in programs use for their instruction data.

use {
    crate::error::StakingError,
    bincode::Options,
    serde::{Deserialize, Serialize},
};

/// Largest instruction payload accepted by [`StakeInstruction::decode`].
pub const MAX_INSTRUCTION_DATA_LEN: u64 = 1_232;

/// Requests understood by [`crate::StakeLedger::process_instruction`].
///
/// The caller's identity is supplied alongside the instruction, never inside
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeInstruction {
    /// Lock `amount` for the tier whose lock duration is `lock_seconds`.
    Stake { amount: u64, lock_seconds: u64 },

    /// Pay out all settled reward.
    ClaimReward,

    /// Return `amount` of unlocked principal.
    Withdraw { amount: u64 },

    /// Add `amount` of the reward asset to the reserve.
    FundReserves { amount: u64 },
}

impl StakeInstruction {
    pub fn encode(&self) -> Result<Vec<u8>, StakingError> {
        bincode::serialize(self).map_err(|_| StakingError::InvalidInstructionData)
    }

    /// Decode instruction data, rejecting payloads over
    /// [`MAX_INSTRUCTION_DATA_LEN`].
    pub fn decode(data: &[u8]) -> Result<Self, StakingError> {
        bincode::options()
            .with_limit(MAX_INSTRUCTION_DATA_LEN)
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .deserialize(data)
            .map_err(|_| StakingError::InvalidInstructionData)
    }
}
