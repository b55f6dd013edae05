//! Persistence of checker state between runs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::github::GitHubRepo;
use crate::log_sink::LogEntry;
use crate::release::ReleaseRecord;
use crate::runtime::Runtime;

/// Everything the checker needs to resume where it left off.
///
/// The installed version is deliberately absent: it always comes from the
/// host, which knows what is actually running.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub cache: Option<CacheEntry>,
    #[serde(default)]
    pub last_check_at: Option<DateTime<Utc>>,
    /// Last successfully fetched release, kept past cache expiry
    #[serde(default)]
    pub latest_release: Option<ReleaseRecord>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

#[cfg_attr(test, mockall::automock)]
pub trait StateStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedState>>;
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// JSON file store. Writes go to a sibling temp file first and are renamed
/// into place.
pub struct FileStateStore<R: Runtime> {
    runtime: R,
    path: PathBuf,
}

impl<R: Runtime> FileStateStore<R> {
    pub fn new(runtime: R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<R: Runtime> StateStore for FileStateStore<R> {
    #[tracing::instrument(skip(self))]
    fn load(&self) -> Result<Option<PersistedState>> {
        if !self.runtime.exists(&self.path) {
            debug!("No state file at {}", self.path.display());
            return Ok(None);
        }

        let content = self.runtime.read_to_string(&self.path)?;
        let state: PersistedState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {}", self.path.display()))?;
        Ok(Some(state))
    }

    #[tracing::instrument(skip(self, state))]
    fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !self.runtime.exists(parent) {
                self.runtime.create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
        let temp = self.temp_path();
        self.runtime.write(&temp, json.as_bytes())?;
        self.runtime.rename(&temp, &self.path)?;

        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

/// Process-local store for hosts that do not need persistence.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<PersistedState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<PersistedState>> {
        let guard = self
            .state
            .lock()
            .map_err(|_| anyhow!("State lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| anyhow!("State lock poisoned"))?;
        *guard = Some(state.clone());
        Ok(())
    }
}

/// Default location: `<data dir>/relcheck/<owner>/<repo>/state.json`.
#[tracing::instrument(skip(runtime))]
pub fn default_state_path<R: Runtime>(runtime: &R, repo: &GitHubRepo) -> Result<PathBuf> {
    let data_dir = runtime
        .data_dir()
        .context("Could not find a data directory; pass --state explicitly")?;
    Ok(data_dir
        .join("relcheck")
        .join(&repo.owner)
        .join(&repo.repo)
        .join("state.json"))
}
