//! Position and snapshot state types for the stake ledger.

use {
    crate::config::TierConfig,
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_clock::UnixTimestamp,
    solana_pubkey::Pubkey,
};

/// Discriminator byte written at the start of every serialised ledger
/// snapshot to distinguish it from foreign or truncated data.
pub const LEDGER_SNAPSHOT_DISCRIMINATOR: u8 = 1;

/// One depositor's stake and reward bookkeeping.
///
/// Created on first stake and never removed; a fully withdrawn position keeps
/// zero principal and whatever reward is still unclaimed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct StakePosition {
    /// Amount currently staked.
    pub principal: u64,

    /// Lock duration of the tier selected at the last stake.
    pub lock_seconds: u64,

    /// When the current lock window began.
    pub stake_timestamp: UnixTimestamp,

    /// Earliest instant principal may be withdrawn.
    ///
    /// `stake_timestamp + lock_seconds`, unless an earlier, longer lock was
    /// still pending when the position was topped up.
    pub lock_end: UnixTimestamp,

    /// The tier's reward index at the last settlement.
    pub reward_per_token_paid: u128,

    /// When reward was last settled into `accrued_reward`.
    pub last_accrual_timestamp: UnixTimestamp,

    /// Reward earned but not yet claimed.
    pub accrued_reward: u64,
}

impl StakePosition {
    /// Whether principal may be withdrawn at `now`.
    #[inline]
    pub fn is_unlocked(&self, now: UnixTimestamp) -> bool {
        now >= self.lock_end
    }
}

/// Everything needed to rebuild a ledger, minus its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct LedgerSnapshot {
    /// Origin of every tier's reward index.
    pub genesis: UnixTimestamp,

    /// Tier table the positions were priced under. Each tier's index runs
    /// from `genesis`, so a restored ledger must keep these rates.
    pub tiers: Vec<TierConfig>,

    /// Sum of all positions' principal.
    pub total_staked: u64,

    /// Reward asset held for payouts.
    pub reward_reserve: u64,

    /// Positions ordered by depositor.
    pub positions: Vec<(Pubkey, StakePosition)>,
}

impl LedgerSnapshot {
    /// Deserialise from raw bytes (expects leading discriminator byte).
    pub fn deserialize(data: &[u8]) -> Result<Self, std::io::Error> {
        if data.first() != Some(&LEDGER_SNAPSHOT_DISCRIMINATOR) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "missing or invalid ledger snapshot discriminator",
            ));
        }
        let mut cursor = &data[1..];
        BorshDeserialize::deserialize_reader(&mut cursor)
    }

    /// Serialise to raw bytes (prepends discriminator byte).
    pub fn serialize(&self) -> Result<Vec<u8>, std::io::Error> {
        let mut data = vec![LEDGER_SNAPSHOT_DISCRIMINATOR];
        BorshSerialize::serialize(self, &mut data)?;
        Ok(data)
    }
}
