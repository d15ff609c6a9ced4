//! E2E Test: Concurrent Access
//!
//! The ledger takes `&mut self` for every mutation, so sharing it between
//! threads means wrapping it in a lock. Verifies that under a
//! `parking_lot::Mutex`:
//! - Interleaved stakes from many threads all land
//! - Interleaved claims never pay more than the reserve held
//! - Custody stays consistent once every thread has finished

#![allow(clippy::arithmetic_side_effects)]

use {
    parking_lot::Mutex,
    solana_pubkey::Pubkey,
    std::{sync::Arc, thread},
    timelock_e2e_tests::helpers::*,
    timelock_stake_ledger::{
        constants::{REWARD_RATE_1_MONTH_BPS, TIER_1_MONTH},
        StakingError,
    },
};

const THREADS: usize = 8;
const ROUNDS: u64 = 25;
const CHUNK: u64 = 10 * UNIT;

// ─────────────────────────────────────────────────────────────────────────────
// Test: Parallel staking, claiming and withdrawing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_parallel_depositors() {
    init_logging();
    println!("\n========================================");
    println!("  CONCURRENCY: {THREADS} threads x {ROUNDS} rounds");
    println!("========================================\n");

    let mut env = SimEnv::new(DEFAULT_RESERVE);
    let depositors: Vec<Pubkey> = (0..THREADS)
        .map(|_| env.new_depositor(ROUNDS * CHUNK))
        .collect();
    let SimEnv {
        ledger,
        clock,
        custody,
        ..
    } = env;
    let ledger = Arc::new(Mutex::new(ledger));

    let handles: Vec<_> = depositors
        .iter()
        .copied()
        .map(|depositor| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    ledger
                        .lock()
                        .stake(&depositor, CHUNK, TIER_1_MONTH)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    {
        let ledger = ledger.lock();
        assert_eq!(ledger.total_staked(), THREADS as u64 * ROUNDS * CHUNK);
        assert_eq!(ledger.events().len(), 1 + THREADS * ROUNDS as usize);
    }
    println!("  All stakes landed");

    clock.advance(TIER_1_MONTH);

    let handles: Vec<_> = depositors
        .iter()
        .copied()
        .map(|depositor| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || -> u64 {
                let mut ledger = ledger.lock();
                let paid = ledger.claim_reward(&depositor).unwrap();
                assert_eq!(
                    ledger.claim_reward(&depositor),
                    Err(StakingError::NothingToClaim)
                );
                ledger.withdraw(&depositor, ROUNDS * CHUNK).unwrap();
                paid
            })
        })
        .collect();
    let paid: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Every depositor staked at the same instant, so all are paid alike.
    let expected = expected_reward(ROUNDS * CHUNK, REWARD_RATE_1_MONTH_BPS, TIER_1_MONTH);
    assert!(paid.iter().all(|&amount| amount == expected));

    let ledger = ledger.lock();
    assert_eq!(ledger.total_staked(), 0);
    assert_eq!(
        ledger.reward_reserve(),
        DEFAULT_RESERVE - expected * THREADS as u64
    );
    assert_eq!(
        ledger
            .transfers()
            .balance_of(timelock_stake_ledger::Asset::Staking, &custody),
        0
    );
    println!("✓ {THREADS} depositors each paid {expected}");
}
