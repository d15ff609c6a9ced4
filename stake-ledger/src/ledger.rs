//! The stake ledger: positions, reserves and the stake / claim / withdraw
//! state machine.
//!
//! Every mutating operation follows the same shape:
//!
//! 1. validate inputs and read the clock,
//! 2. copy the depositor's position and settle accrued reward into the copy,
//! 3. apply the mutation to the copy and compute new totals,
//! 4. ask the [`AssetTransfer`] collaborator to move funds,
//! 5. only if that succeeds, commit the copy and totals and record an event.
//!
//! A failure at any step leaves the ledger exactly as it was. Mutators take
//! `&mut self`, so a transfer collaborator cannot call back into the ledger
//! mid-operation.

use {
    crate::{
        clock::TimeSource,
        config::{StakingConfig, TierConfig},
        error::{ConfigError, StakingError},
        event::StakeEvent,
        instruction::StakeInstruction,
        rewards::{pending_reward, reward_index_at},
        state::{LedgerSnapshot, StakePosition},
        transfer::{Asset, AssetTransfer},
    },
    log::*,
    solana_clock::UnixTimestamp,
    solana_pubkey::Pubkey,
    std::collections::BTreeMap,
};

/// Owns every stake position and the custody totals backing them.
///
/// Not internally synchronised: share it across threads behind a mutex held
/// for the whole call.
#[derive(Debug)]
pub struct StakeLedger<C, T> {
    config: StakingConfig,
    clock: C,
    transfers: T,
    /// Origin of every tier's reward index.
    genesis: UnixTimestamp,
    positions: BTreeMap<Pubkey, StakePosition>,
    total_staked: u64,
    reward_reserve: u64,
    events: Vec<StakeEvent>,
}

impl<C: TimeSource, T: AssetTransfer> StakeLedger<C, T> {
    /// Create an empty ledger. Reward indexes start at the clock's current time.
    pub fn new(config: StakingConfig, clock: C, transfers: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let genesis = clock.now();
        info!(
            "stake ledger created at {genesis} with {} tiers",
            config.tiers.len()
        );
        Ok(Self {
            config,
            clock,
            transfers,
            genesis,
            positions: BTreeMap::new(),
            total_staked: 0,
            reward_reserve: 0,
            events: Vec::new(),
        })
    }

    /// Rebuild a ledger from a [`LedgerSnapshot`].
    pub fn restore(
        config: StakingConfig,
        snapshot: LedgerSnapshot,
        clock: C,
        transfers: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        for recorded in &snapshot.tiers {
            if let Some(configured) = config.tier(recorded.lock_seconds) {
                if configured.reward_rate_bps != recorded.reward_rate_bps {
                    return Err(ConfigError::TierRateChanged {
                        lock_seconds: recorded.lock_seconds,
                        recorded_bps: recorded.reward_rate_bps,
                        configured_bps: configured.reward_rate_bps,
                    });
                }
            }
        }

        let mut positions = BTreeMap::new();
        let mut computed: u64 = 0;
        for (depositor, position) in snapshot.positions {
            let priced = snapshot
                .tiers
                .iter()
                .any(|tier| tier.lock_seconds == position.lock_seconds);
            if position.principal > 0 && !(priced && config.is_valid_tier(position.lock_seconds)) {
                return Err(ConfigError::UnknownPositionTier {
                    lock_seconds: position.lock_seconds,
                });
            }
            computed = computed
                .checked_add(position.principal)
                .ok_or(ConfigError::SnapshotPrincipalOverflow)?;
            if positions.insert(depositor, position).is_some() {
                return Err(ConfigError::DuplicatePosition { depositor });
            }
        }
        if computed != snapshot.total_staked {
            return Err(ConfigError::SnapshotTotalMismatch {
                recorded: snapshot.total_staked,
                computed,
            });
        }
        info!(
            "stake ledger restored: {} positions, {} staked, {} in reserve",
            positions.len(),
            snapshot.total_staked,
            snapshot.reward_reserve
        );
        Ok(Self {
            config,
            clock,
            transfers,
            genesis: snapshot.genesis,
            positions,
            total_staked: snapshot.total_staked,
            reward_reserve: snapshot.reward_reserve,
            events: Vec::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Lock `amount` of the staking asset into `depositor`'s position under the
    /// tier whose lock duration is `lock_seconds`.
    ///
    /// Pending reward is settled first at the old tier's rate. The whole
    /// principal then restarts its lock at the new tier, except that an
    /// unexpired longer lock is never shortened.
    pub fn stake(
        &mut self,
        depositor: &Pubkey,
        amount: u64,
        lock_seconds: u64,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            debug!("stake: zero amount from {depositor:?}");
            return Err(StakingError::ZeroAmount);
        }
        if !self.config.is_valid_tier(lock_seconds) {
            debug!("stake: invalid lock tier {lock_seconds} from {depositor:?}");
            return Err(StakingError::InvalidTier);
        }

        let now = self.clock.now();
        let new_index = self.tier_index(lock_seconds, now)?;

        let mut position = self.positions.get(depositor).copied().unwrap_or_default();
        self.settle(&mut position, now)?;

        if position.principal == 0 || position.lock_seconds != lock_seconds {
            position.reward_per_token_paid = new_index;
        }
        let lock_end = i64::try_from(lock_seconds)
            .ok()
            .and_then(|secs| now.checked_add(secs))
            .ok_or(StakingError::ArithmeticOverflow)?;

        position.principal = position
            .principal
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        position.lock_seconds = lock_seconds;
        position.stake_timestamp = now;
        position.lock_end = position.lock_end.max(lock_end);
        position.last_accrual_timestamp = now;

        let total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        self.transfers
            .transfer_from(Asset::Staking, depositor, amount)
            .map_err(|err| {
                warn!("stake: transfer of {amount} from {depositor:?} failed: {err}");
                StakingError::TransferFailed
            })?;

        self.positions.insert(*depositor, position);
        self.total_staked = total_staked;
        self.record(StakeEvent::Staked {
            depositor: *depositor,
            amount,
            lock_seconds,
        });
        info!(
            "stake: {amount} locked by {depositor:?} for {lock_seconds}s, unlocks at {}",
            position.lock_end
        );
        Ok(())
    }

    /// Reward `depositor` could claim right now. Unknown depositors have earned
    /// nothing.
    pub fn earned(&self, depositor: &Pubkey) -> Result<u64, StakingError> {
        let Some(mut position) = self.positions.get(depositor).copied() else {
            return Ok(0);
        };
        self.settle(&mut position, self.clock.now())?;
        Ok(position.accrued_reward)
    }

    /// Pay `depositor` all settled reward out of the reserve, returning the
    /// amount paid.
    pub fn claim_reward(&mut self, depositor: &Pubkey) -> Result<u64, StakingError> {
        let Some(mut position) = self.positions.get(depositor).copied() else {
            debug!("claim_reward: no position for {depositor:?}");
            return Err(StakingError::NothingToClaim);
        };
        let now = self.clock.now();
        self.settle(&mut position, now)?;

        let owed = position.accrued_reward;
        if owed == 0 {
            debug!("claim_reward: nothing owed to {depositor:?}");
            return Err(StakingError::NothingToClaim);
        }
        let Some(reward_reserve) = self.reward_reserve.checked_sub(owed) else {
            warn!(
                "claim_reward: reserve {} cannot cover {owed} owed to {depositor:?}",
                self.reward_reserve
            );
            return Err(StakingError::InsufficientReserves);
        };
        position.accrued_reward = 0;

        self.transfers
            .transfer(Asset::Reward, depositor, owed)
            .map_err(|err| {
                warn!("claim_reward: payout of {owed} to {depositor:?} failed: {err}");
                StakingError::TransferFailed
            })?;

        self.positions.insert(*depositor, position);
        self.reward_reserve = reward_reserve;
        self.record(StakeEvent::RewardClaimed {
            depositor: *depositor,
            amount: owed,
        });
        info!("claim_reward: {owed} paid to {depositor:?}");
        Ok(owed)
    }

    /// Return `amount` of principal to `depositor` once the lock has expired.
    ///
    /// Reward accrued so far is settled first and stays claimable, even when
    /// the whole principal is withdrawn.
    pub fn withdraw(&mut self, depositor: &Pubkey, amount: u64) -> Result<(), StakingError> {
        let mut position = self.positions.get(depositor).copied().unwrap_or_default();
        if amount == 0 || amount > position.principal {
            debug!(
                "withdraw: {amount} requested by {depositor:?}, {} staked",
                position.principal
            );
            return Err(StakingError::InsufficientStake);
        }

        let now = self.clock.now();
        if !position.is_unlocked(now) {
            debug!(
                "withdraw: lock for {depositor:?} expires at {}, current time is {now}",
                position.lock_end
            );
            return Err(StakingError::LockNotExpired);
        }

        self.settle(&mut position, now)?;
        position.principal = position
            .principal
            .checked_sub(amount)
            .ok_or(StakingError::InsufficientStake)?;
        let total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        self.transfers
            .transfer(Asset::Staking, depositor, amount)
            .map_err(|err| {
                warn!("withdraw: return of {amount} to {depositor:?} failed: {err}");
                StakingError::TransferFailed
            })?;

        self.positions.insert(*depositor, position);
        self.total_staked = total_staked;
        self.record(StakeEvent::Withdrawn {
            depositor: *depositor,
            amount,
        });
        info!(
            "withdraw: {amount} returned to {depositor:?}, {} still staked",
            position.principal
        );
        Ok(())
    }

    /// Pull `amount` of the reward asset from `funder` into the reward reserve.
    pub fn fund_reserves(&mut self, funder: &Pubkey, amount: u64) -> Result<(), StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let reward_reserve = self
            .reward_reserve
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        self.transfers
            .transfer_from(Asset::Reward, funder, amount)
            .map_err(|err| {
                warn!("fund_reserves: transfer of {amount} from {funder:?} failed: {err}");
                StakingError::TransferFailed
            })?;

        self.reward_reserve = reward_reserve;
        self.record(StakeEvent::ReservesFunded {
            funder: *funder,
            amount,
        });
        info!("fund_reserves: {amount} added by {funder:?}, reserve now {reward_reserve}");
        Ok(())
    }

    /// Decode a serialised [`StakeInstruction`] and run it on behalf of `caller`.
    pub fn process_instruction(&mut self, caller: &Pubkey, data: &[u8]) -> Result<(), StakingError> {
        let instruction = StakeInstruction::decode(data).inspect_err(|err| {
            debug!("process_instruction: undecodable data from {caller:?}: {err}");
        })?;
        trace!("process_instruction: {instruction:?} from {caller:?}");
        let result = match instruction {
            StakeInstruction::Stake {
                amount,
                lock_seconds,
            } => self.stake(caller, amount, lock_seconds),
            StakeInstruction::ClaimReward => self.claim_reward(caller).map(|_| ()),
            StakeInstruction::Withdraw { amount } => self.withdraw(caller, amount),
            StakeInstruction::FundReserves { amount } => self.fund_reserves(caller, amount),
        };
        if let Err(err) = &result {
            debug!(
                "process_instruction: {caller:?} failed with code {}: {err}",
                err.code()
            );
        }
        result
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn position(&self, depositor: &Pubkey) -> Option<StakePosition> {
        self.positions.get(depositor).copied()
    }

    /// Earliest time `depositor` may withdraw.
    pub fn unlock_time(&self, depositor: &Pubkey) -> Option<UnixTimestamp> {
        self.positions.get(depositor).map(|p| p.lock_end)
    }

    pub fn total_staked(&self) -> u64 {
        self.total_staked
    }

    pub fn reward_reserve(&self) -> u64 {
        self.reward_reserve
    }

    pub fn config(&self) -> &StakingConfig {
        &self.config
    }

    pub fn tiers(&self) -> &[TierConfig] {
        &self.config.tiers
    }

    pub fn genesis(&self) -> UnixTimestamp {
        self.genesis
    }

    pub fn now(&self) -> UnixTimestamp {
        self.clock.now()
    }

    pub fn transfers(&self) -> &T {
        &self.transfers
    }

    pub fn transfers_mut(&mut self) -> &mut T {
        &mut self.transfers
    }

    /// Events recorded since the last [`StakeLedger::drain_events`].
    pub fn events(&self) -> &[StakeEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<StakeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            genesis: self.genesis,
            tiers: self.config.tiers.clone(),
            total_staked: self.total_staked,
            reward_reserve: self.reward_reserve,
            positions: self.positions.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Accrual
    // -----------------------------------------------------------------------

    fn tier_index(&self, lock_seconds: u64, now: UnixTimestamp) -> Result<u128, StakingError> {
        let tier = self
            .config
            .tier(lock_seconds)
            .ok_or(StakingError::InvalidTier)?;
        reward_index_at(tier.reward_rate_bps, self.genesis, now)
    }

    fn record(&mut self, event: StakeEvent) {
        trace!("event for {:?}: {event:?}", event.account());
        self.events.push(event);
    }

    /// Move reward earned since the last settlement into `accrued_reward`.
    fn settle(&self, position: &mut StakePosition, now: UnixTimestamp) -> Result<(), StakingError> {
        if position.principal == 0 {
            return Ok(());
        }
        let index_now = self.tier_index(position.lock_seconds, now)?;
        let pending = pending_reward(position.principal, index_now, position.reward_per_token_paid)?;
        position.accrued_reward = position
            .accrued_reward
            .checked_add(pending)
            .ok_or(StakingError::ArithmeticOverflow)?;
        // A clock that steps backwards must not let an interval be earned twice.
        position.reward_per_token_paid = position.reward_per_token_paid.max(index_now);
        position.last_accrual_timestamp = position.last_accrual_timestamp.max(now);
        Ok(())
    }
}
