//! Immutable views handed to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::release::ReleaseRecord;
use crate::version;

/// Snapshot of what the checker currently knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatus {
    pub available: bool,
    pub installed_version: String,
    pub latest_version: Option<String>,
    pub release_info: Option<ReleaseRecord>,
}

impl UpdateStatus {
    pub fn compute(installed_version: &str, latest: Option<&ReleaseRecord>) -> Self {
        let available = latest
            .map(|record| version::is_newer(&record.version, installed_version))
            .unwrap_or(false);

        UpdateStatus {
            available,
            installed_version: installed_version.to_string(),
            latest_version: latest.map(|record| record.version.clone()),
            release_info: latest.cloned(),
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Installed version: {}", self.installed_version)?;
        writeln!(
            f,
            "Latest version:    {}",
            self.latest_version.as_deref().unwrap_or("unknown")
        )?;
        if self.available {
            write!(f, "Update available")?;
            if let Some(info) = &self.release_info {
                write!(f, ": {}", info.download_url)?;
            }
            Ok(())
        } else {
            write!(f, "Up to date")
        }
    }
}

/// Terminal state of one pass through the check state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Upstream is newer than the installed version
    Updated { latest_version: String },
    /// Upstream is the same or older
    NotUpdated { latest_version: String },
    /// Fetch failed; previous state kept
    Failed { reason: String },
    /// Rate-limit gate was closed; nothing happened
    Skipped,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Updated { latest_version } => {
                write!(f, "Update available: {}", latest_version)
            }
            CheckOutcome::NotUpdated { latest_version } => {
                write!(f, "Up to date (latest release is {})", latest_version)
            }
            CheckOutcome::Failed { reason } => write!(f, "Check failed: {}", reason),
            CheckOutcome::Skipped => write!(f, "Skipped: checked recently"),
        }
    }
}
