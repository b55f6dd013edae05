//! Release cache and the rate-limit gate guarding upstream fetches.
//!
//! Expiry is lazy: a stale entry stays in place and is simply not returned.
//! A cached record is fresh while `now - cached_at < ttl`, so at exactly
//! `cached_at + ttl` it is already expired.

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::release::ReleaseRecord;

/// Lifetime of a cached release.
pub const DEFAULT_CACHE_TTL: TimeDelta = TimeDelta::hours(1);

/// Minimum spacing between two background checks.
pub const DEFAULT_CHECK_INTERVAL: TimeDelta = TimeDelta::hours(1);

/// A release plus the moment it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub record: ReleaseRecord,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.cached_at < ttl
    }
}

/// What the checker knows about its own attempts and installation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckState {
    /// Last attempted check, successful or not
    pub last_check_at: Option<DateTime<Utc>>,
    /// Version currently running
    pub installed_version: String,
}

#[derive(Debug)]
pub struct CacheStore {
    entry: Option<CacheEntry>,
    check: CheckState,
    ttl: TimeDelta,
}

impl CacheStore {
    pub fn new(installed_version: impl Into<String>, ttl: TimeDelta) -> Self {
        Self {
            entry: None,
            check: CheckState {
                last_check_at: None,
                installed_version: installed_version.into(),
            },
            ttl,
        }
    }

    /// Rebuilds a store from previously persisted pieces.
    pub fn restore(
        entry: Option<CacheEntry>,
        last_check_at: Option<DateTime<Utc>>,
        installed_version: impl Into<String>,
        ttl: TimeDelta,
    ) -> Self {
        let mut store = Self::new(installed_version, ttl);
        store.entry = entry;
        store.check.last_check_at = last_check_at;
        store
    }

    /// The cached record, if it has not expired yet.
    pub fn get(&self, now: DateTime<Utc>) -> Option<&ReleaseRecord> {
        self.entry
            .as_ref()
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| &entry.record)
    }

    pub fn put(&mut self, record: ReleaseRecord, now: DateTime<Utc>) {
        debug!("Caching release {} at {}", record.version, now);
        self.entry = Some(CacheEntry {
            record,
            cached_at: now,
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Rate-limit gate: true when no attempt was recorded within `interval`.
    ///
    /// A clock that moved backwards past the last attempt also opens the
    /// gate, otherwise checks would stall until the clock caught up.
    pub fn should_check(&self, now: DateTime<Utc>, interval: TimeDelta) -> bool {
        match self.check.last_check_at {
            None => true,
            Some(last) => now < last || now - last >= interval,
        }
    }

    /// Records an attempt whatever its outcome, so failures cannot cause a
    /// storm of checks.
    pub fn record_check_attempt(&mut self, now: DateTime<Utc>) {
        self.check.last_check_at = Some(now);
    }

    pub fn reset_check_attempt(&mut self) {
        self.check.last_check_at = None;
    }

    /// Raw entry, including an expired one.
    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    pub fn check_state(&self) -> &CheckState {
        &self.check
    }

    pub fn installed_version(&self) -> &str {
        &self.check.installed_version
    }

    pub fn set_installed_version(&mut self, version: impl Into<String>) {
        self.check.installed_version = version.into();
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}
