//! Daily quota tracker.
//!
//! Maps client identity → `(day, used)`. A record is created on first sight,
//! reset when the stored day differs from the caller's `today`, and never
//! persisted. The identity string is an opaque key.
//!
//! Thread-safe via `std::sync::Mutex` (non-async, held briefly). The check
//! and the increment happen under the same guard, so concurrent callers for
//! one identity can never push `used` past the limit.

use chrono::NaiveDate;
use intentgate_core::QuotaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Above this many records, stale days are evicted on the next consume.
/// After a sweep the trigger moves to twice the surviving count, so a map
/// full of same-day identities is not rescanned on every call.
const EVICTION_THRESHOLD: usize = 10_000;

/// Usage after an accepted command; returned to clients as `rate_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInfo {
    pub remaining: u32,
    pub used: u32,
    pub limit: u32,
}

impl UsageInfo {
    fn new(used: u32, limit: u32) -> Self {
        Self {
            remaining: limit.saturating_sub(used),
            used,
            limit,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct QuotaRecord {
    day: NaiveDate,
    used: u32,
}

#[derive(Debug)]
struct Records {
    by_identity: HashMap<String, QuotaRecord>,
    /// Sweep when `by_identity` grows past this.
    sweep_above: usize,
}

impl Default for Records {
    fn default() -> Self {
        Self {
            by_identity: HashMap::new(),
            sweep_above: EVICTION_THRESHOLD,
        }
    }
}

impl Records {
    fn sweep(&mut self, today: NaiveDate) {
        let before = self.by_identity.len();
        self.by_identity.retain(|_, record| record.day == today);
        let kept = self.by_identity.len();
        self.sweep_above = EVICTION_THRESHOLD.max(kept.saturating_mul(2));
        debug!(
            evicted = before - kept,
            next_sweep_above = self.sweep_above,
            "Evicted stale quota records"
        );
    }
}

#[derive(Debug, Default)]
pub struct QuotaTracker {
    records: Mutex<Records>,
}

impl QuotaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check the budget for `identity` on `today` and take one unit.
    ///
    /// Fails with [`QuotaError::Exceeded`] when `limit` units are already
    /// used today; a failed call leaves the record untouched.
    pub fn try_consume(
        &self,
        identity: &str,
        limit: u32,
        today: NaiveDate,
    ) -> Result<UsageInfo, QuotaError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());

        if records.by_identity.len() > records.sweep_above {
            records.sweep(today);
        }

        let record = records
            .by_identity
            .entry(identity.to_string())
            .or_insert(QuotaRecord { day: today, used: 0 });

        if record.day != today {
            *record = QuotaRecord { day: today, used: 0 };
        }

        if record.used >= limit {
            warn!(client = %identity, limit, "Daily quota exceeded");
            return Err(QuotaError::Exceeded { limit });
        }

        record.used += 1;
        Ok(UsageInfo::new(record.used, limit))
    }

    /// Current usage for `identity` on `today`, without consuming anything.
    pub fn usage(&self, identity: &str, limit: u32, today: NaiveDate) -> UsageInfo {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let used = records
            .by_identity
            .get(identity)
            .filter(|record| record.day == today)
            .map_or(0, |record| record.used);
        UsageInfo::new(used, limit)
    }

    /// Number of identities currently tracked.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .by_identity
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
