//! Update checker service.
//!
//! Ties the fetcher, the cache, the version comparison and the log sink
//! together behind a handful of entry points the host calls directly:
//!
//! - [`UpdateChecker::trigger_check`]: background check, always rate-limited
//! - [`UpdateChecker::force_check`]: user-initiated check, bypasses the gate
//! - [`UpdateChecker::current_status`]: status view, refreshing if the gate
//!   is open
//! - [`UpdateChecker::get_recent_logs`]: diagnostics tail
//!
//! All state lives behind one async mutex that a check holds across its
//! fetch, so checks never overlap. A background trigger that had to wait for
//! an in-flight check finds the gate closed and is coalesced into
//! [`CheckOutcome::Skipped`].

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use tokio::sync::Mutex;

use crate::cache::{CacheStore, DEFAULT_CACHE_TTL, DEFAULT_CHECK_INTERVAL};
use crate::github::{FetchRelease, RepoLocator};
use crate::http::FetchError;
use crate::log_sink::{LogEntry, LogSink};
use crate::release::ReleaseRecord;
use crate::runtime::Runtime;
use crate::state::{PersistedState, StateStore};
use crate::status::{CheckOutcome, UpdateStatus};
use crate::version;

/// Settings for one checker instance.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub locator: RepoLocator,
    pub installed_version: String,
    pub check_interval: TimeDelta,
    pub cache_ttl: TimeDelta,
}

impl CheckerConfig {
    pub fn new(locator: RepoLocator, installed_version: impl Into<String>) -> Self {
        Self {
            locator,
            installed_version: installed_version.into(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn with_check_interval(mut self, interval: TimeDelta) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: TimeDelta) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

struct CheckerState {
    cache: CacheStore,
    /// Last successfully fetched release; outlives cache expiry so a failed
    /// check keeps the previous status
    latest_release: Option<ReleaseRecord>,
    logs: LogSink,
}

impl CheckerState {
    fn restore(config: &CheckerConfig, persisted: PersistedState) -> Self {
        Self {
            cache: CacheStore::restore(
                persisted.cache,
                persisted.last_check_at,
                config.installed_version.clone(),
                config.cache_ttl,
            ),
            latest_release: persisted.latest_release,
            logs: LogSink::restore(persisted.logs),
        }
    }

    fn snapshot(&self) -> PersistedState {
        PersistedState {
            cache: self.cache.entry().cloned(),
            last_check_at: self.cache.check_state().last_check_at,
            latest_release: self.latest_release.clone(),
            logs: self.logs.entries(),
        }
    }

    fn status(&self, now: DateTime<Utc>) -> UpdateStatus {
        let latest = self.cache.get(now).or(self.latest_release.as_ref());
        UpdateStatus::compute(self.cache.installed_version(), latest)
    }
}

pub struct UpdateChecker<F: FetchRelease, R: Runtime, S: StateStore> {
    locator: RepoLocator,
    check_interval: TimeDelta,
    fetcher: F,
    runtime: R,
    store: S,
    state: Mutex<CheckerState>,
}

impl<F: FetchRelease, R: Runtime, S: StateStore> UpdateChecker<F, R, S> {
    /// Creates a checker, resuming from whatever `store` holds.
    ///
    /// An unreadable store is not fatal: the checker starts fresh and the
    /// next save overwrites it.
    pub fn new(config: CheckerConfig, fetcher: F, runtime: R, store: S) -> Self {
        let persisted = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => PersistedState::default(),
            Err(e) => {
                warn!("Ignoring unreadable checker state: {:#}", e);
                PersistedState::default()
            }
        };

        let state = CheckerState::restore(&config, persisted);

        Self {
            locator: config.locator,
            check_interval: config.check_interval,
            fetcher,
            runtime,
            store,
            state: Mutex::new(state),
        }
    }

    pub fn locator(&self) -> &RepoLocator {
        &self.locator
    }

    /// Rate-limited background check.
    #[tracing::instrument(skip(self))]
    pub async fn trigger_check(&self) -> CheckOutcome {
        let mut state = self.state.lock().await;
        let now = self.runtime.now();

        if !state.cache.should_check(now, self.check_interval) {
            debug!("Skipping check for {}: checked recently", self.locator.repo);
            return CheckOutcome::Skipped;
        }

        let (outcome, _) = self.check_locked(&mut state, now, true).await;
        self.persist(&state);
        outcome
    }

    /// User-initiated check. Drops the cache, opens the gate and fetches
    /// immediately; the failure is returned to the caller instead of being
    /// swallowed.
    #[tracing::instrument(skip(self))]
    pub async fn force_check(&self) -> Result<UpdateStatus, FetchError> {
        let mut state = self.state.lock().await;
        let now = self.runtime.now();

        state.cache.invalidate();
        state.cache.reset_check_attempt();

        let (_, result) = self.check_locked(&mut state, now, false).await;
        self.persist(&state);

        result.map(|_| state.status(now))
    }

    /// Status view. Runs a check first only when the gate is open, so two
    /// calls in a row cost at most one fetch.
    #[tracing::instrument(skip(self))]
    pub async fn current_status(&self) -> UpdateStatus {
        let mut state = self.state.lock().await;
        let now = self.runtime.now();

        if state.cache.should_check(now, self.check_interval) {
            let (outcome, _) = self.check_locked(&mut state, now, true).await;
            debug!("{}", outcome);
            self.persist(&state);
        }

        state.status(now)
    }

    /// Host-facing name for [`current_status`](Self::current_status).
    pub async fn get_status(&self) -> UpdateStatus {
        self.current_status().await
    }

    /// The newest `n` log entries, oldest first.
    pub async fn get_recent_logs(&self, n: usize) -> Vec<LogEntry> {
        self.state.lock().await.logs.tail(n)
    }

    pub async fn last_check_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.cache.check_state().last_check_at
    }

    /// The host finished installing `new_version`. Everything learned about
    /// the old installation is discarded.
    #[tracing::instrument(skip(self))]
    pub async fn record_upgrade(&self, new_version: &str) {
        let mut state = self.state.lock().await;
        let now = self.runtime.now();

        state.cache.invalidate();
        state.cache.reset_check_attempt();
        state.cache.set_installed_version(new_version);
        state.latest_release = None;
        state
            .logs
            .info(format!("Updated successfully to version {}", new_version), now);

        self.persist(&state);
    }

    /// True while a check (or any other operation) holds the state lock.
    pub fn is_checking(&self) -> bool {
        self.state.try_lock().is_err()
    }

    /// One pass of `Checking -> {Updated | NotUpdated | Failed}`. The attempt
    /// is recorded whatever the outcome.
    async fn check_locked(
        &self,
        state: &mut CheckerState,
        now: DateTime<Utc>,
        use_cache: bool,
    ) -> (CheckOutcome, Result<ReleaseRecord, FetchError>) {
        debug!("Checking {} for updates", self.locator);

        let cached = if use_cache {
            state.cache.get(now).cloned()
        } else {
            None
        };

        let result = match cached {
            Some(record) => {
                debug!("Using cached release {}", record.version);
                Ok(record)
            }
            None => {
                let fetched = self.fetcher.fetch(&self.locator).await;
                if let Ok(record) = &fetched {
                    state.cache.put(record.clone(), now);
                }
                fetched
            }
        };

        state.cache.record_check_attempt(now);

        let outcome = match &result {
            Ok(record) => {
                state.latest_release = Some(record.clone());
                let installed = state.cache.installed_version().to_string();
                if version::is_newer(&record.version, &installed) {
                    state.logs.info(
                        format!(
                            "Update available: {} (installed {})",
                            record.version, installed
                        ),
                        now,
                    );
                    CheckOutcome::Updated {
                        latest_version: record.version.clone(),
                    }
                } else {
                    state.logs.info(
                        format!(
                            "No update: latest release {} (installed {})",
                            record.version, installed
                        ),
                        now,
                    );
                    CheckOutcome::NotUpdated {
                        latest_version: record.version.clone(),
                    }
                }
            }
            Err(e) => {
                state.logs.error(
                    format!("Failed to fetch release for {}: {}", self.locator.repo, e),
                    now,
                );
                CheckOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        (outcome, result)
    }

    fn persist(&self, state: &CheckerState) {
        if let Err(e) = self.store.save(&state.snapshot()) {
            warn!("Failed to save checker state: {:#}", e);
        }
    }
}
