//! Domain events recorded by the ledger after each successful operation.

use {
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeEvent {
    /// `amount` was locked into `depositor`'s position for `lock_seconds`.
    Staked {
        depositor: Pubkey,
        amount: u64,
        lock_seconds: u64,
    },

    /// `amount` of reward was paid out to `depositor`.
    RewardClaimed { depositor: Pubkey, amount: u64 },

    /// `amount` of principal was returned to `depositor`.
    Withdrawn { depositor: Pubkey, amount: u64 },

    /// `funder` added `amount` to the reward reserve.
    ReservesFunded { funder: Pubkey, amount: u64 },
}

impl StakeEvent {
    /// The account the event concerns.
    pub fn account(&self) -> &Pubkey {
        match self {
            Self::Staked { depositor, .. }
            | Self::RewardClaimed { depositor, .. }
            | Self::Withdrawn { depositor, .. } => depositor,
            Self::ReservesFunded { funder, .. } => funder,
        }
    }
}
