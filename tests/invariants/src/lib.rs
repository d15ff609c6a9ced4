//! Property-Based Invariant Tests
//!
//! Uses proptest to verify critical stake ledger invariants across:
//! - Reward accrual monotonicity, proportionality and rounding direction
//! - Lock enforcement for every tier
//! - Solvency of custody balances under arbitrary operation sequences
