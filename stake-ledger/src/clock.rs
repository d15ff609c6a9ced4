//! Time sources consumed by the ledger.
//!
//! The ledger never reads the host clock directly; it asks an injected
//! [`TimeSource`] so tests can drive time explicitly.

use {
    solana_clock::UnixTimestamp,
    std::{
        sync::{
            atomic::{AtomicI64, Ordering},
            Arc,
        },
        time::{SystemTime, UNIX_EPOCH},
    },
};

/// Supplies the current unix timestamp in seconds.
pub trait TimeSource {
    fn now(&self) -> UnixTimestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> UnixTimestamp {
        (**self).now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> UnixTimestamp {
        (**self).now()
    }
}

/// Wall-clock time of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> UnixTimestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| UnixTimestamp::try_from(d.as_secs()).ok())
            .unwrap_or_default()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep a handle while
/// the ledger owns another.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: UnixTimestamp) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start)),
        }
    }

    /// Move time forward by `seconds`, saturating at `i64::MAX`.
    pub fn advance(&self, seconds: u64) -> UnixTimestamp {
        let delta = UnixTimestamp::try_from(seconds).unwrap_or(UnixTimestamp::MAX);
        let mut current = self.now.load(Ordering::Acquire);
        loop {
            let next = current.saturating_add(delta);
            match self
                .now
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(observed) => current = observed,
            }
        }
    }

    /// Jump to an absolute timestamp.
    pub fn set(&self, timestamp: UnixTimestamp) {
        self.now.store(timestamp, Ordering::Release);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> UnixTimestamp {
        self.now.load(Ordering::Acquire)
    }
}
