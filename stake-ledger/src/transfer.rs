//! Asset movement collaborator.
//!
//! The ledger only records balances. Moving the underlying tokens is
//! delegated to an [`AssetTransfer`] implementation, which must either move
//! the full amount or fail without side effects.

use {
    crate::error::TransferError,
    borsh::{BorshDeserialize, BorshSerialize},
    log::*,
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
    std::collections::HashMap,
};

/// The two assets the ledger holds in custody.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub enum Asset {
    /// The asset depositors lock up.
    Staking,
    /// The asset rewards are paid in.
    Reward,
}

/// Moves assets between depositors and the ledger's custody account.
pub trait AssetTransfer {
    /// Pull `amount` of `asset` from `payer` into ledger custody.
    fn transfer_from(
        &mut self,
        asset: Asset,
        payer: &Pubkey,
        amount: u64,
    ) -> Result<(), TransferError>;

    /// Pay `amount` of `asset` out of ledger custody to `recipient`.
    fn transfer(&mut self, asset: Asset, recipient: &Pubkey, amount: u64)
        -> Result<(), TransferError>;
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for &mut T {
    fn transfer_from(
        &mut self,
        asset: Asset,
        payer: &Pubkey,
        amount: u64,
    ) -> Result<(), TransferError> {
        (**self).transfer_from(asset, payer, amount)
    }

    fn transfer(
        &mut self,
        asset: Asset,
        recipient: &Pubkey,
        amount: u64,
    ) -> Result<(), TransferError> {
        (**self).transfer(asset, recipient, amount)
    }
}

/// Token balances and allowances kept in memory, keyed by asset and holder.
///
/// `transfer_from` behaves like an ERC-20 pull: the payer must have approved
/// the custody account for at least `amount`, and the allowance is consumed.
#[derive(Debug, Clone)]
pub struct InMemoryTokenBank {
    custody: Pubkey,
    balances: HashMap<(Asset, Pubkey), u64>,
    allowances: HashMap<(Asset, Pubkey), u64>,
}

impl InMemoryTokenBank {
    pub fn new(custody: Pubkey) -> Self {
        Self {
            custody,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// The account that holds assets on behalf of the ledger.
    pub fn custody(&self) -> &Pubkey {
        &self.custody
    }

    pub fn balance_of(&self, asset: Asset, holder: &Pubkey) -> u64 {
        self.balances.get(&(asset, *holder)).copied().unwrap_or(0)
    }

    /// Amount `owner` has approved the custody account to pull.
    pub fn allowance(&self, asset: Asset, owner: &Pubkey) -> u64 {
        self.allowances.get(&(asset, *owner)).copied().unwrap_or(0)
    }

    /// Create `amount` new tokens in `holder`'s balance.
    pub fn mint(&mut self, asset: Asset, holder: &Pubkey, amount: u64) -> Result<(), TransferError> {
        let balance = self.balances.entry((asset, *holder)).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    /// Set the allowance `owner` grants the custody account.
    pub fn approve(&mut self, asset: Asset, owner: &Pubkey, amount: u64) {
        self.allowances.insert((asset, *owner), amount);
    }

    fn move_balance(
        &mut self,
        asset: Asset,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<(), TransferError> {
        let available = self.balance_of(asset, from);
        let from_after = available
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientBalance {
                available,
                required: amount,
            })?;
        let to_after = self
            .balance_of(asset, to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        self.balances.insert((asset, *from), from_after);
        self.balances.insert((asset, *to), to_after);
        Ok(())
    }
}

impl AssetTransfer for InMemoryTokenBank {
    fn transfer_from(
        &mut self,
        asset: Asset,
        payer: &Pubkey,
        amount: u64,
    ) -> Result<(), TransferError> {
        if *payer == self.custody {
            return Err(TransferError::Rejected(
                "custody account cannot pay into itself".to_string(),
            ));
        }
        let approved = self.allowance(asset, payer);
        let remaining = approved
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientAllowance {
                approved,
                required: amount,
            })?;
        let custody = self.custody;
        self.move_balance(asset, payer, &custody, amount)?;
        self.allowances.insert((asset, *payer), remaining);
        trace!("bank: pulled {amount} {asset:?} from {payer:?}");
        Ok(())
    }

    fn transfer(
        &mut self,
        asset: Asset,
        recipient: &Pubkey,
        amount: u64,
    ) -> Result<(), TransferError> {
        if *recipient == self.custody {
            return Err(TransferError::Rejected(
                "custody account cannot pay itself".to_string(),
            ));
        }
        let custody = self.custody;
        self.move_balance(asset, &custody, recipient, amount)?;
        trace!("bank: paid {amount} {asset:?} to {recipient:?}");
        Ok(())
    }
}
