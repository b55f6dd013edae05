//! Command-line handlers. Each subcommand builds the checker from a
//! [`Config`] and calls one of its entry points.

pub mod config;
mod check;
mod logs;
mod status;
mod upgraded;
mod watch;

pub use check::{check, force_check};
pub use config::{Config, Options};
pub use logs::{DEFAULT_LOG_LINES, logs};
pub use status::status;
pub use upgraded::upgraded;
pub use watch::watch;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::checker::{CheckerConfig, UpdateChecker};
    use crate::github::{MockFetchRelease, RepoLocator};
    use crate::release::ReleaseRecord;
    use crate::runtime::MockRuntime;
    use crate::state::MemoryStateStore;

    pub type TestChecker = UpdateChecker<MockFetchRelease, MockRuntime, MemoryStateStore>;

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    pub fn record(version: &str) -> ReleaseRecord {
        ReleaseRecord {
            version: version.to_string(),
            download_url: "https://x/plugin.zip".to_string(),
            ..Default::default()
        }
    }

    /// Checker with a frozen clock around the given fetcher.
    pub fn checker(fetcher: MockFetchRelease) -> TestChecker {
        let mut runtime = MockRuntime::new();
        runtime.expect_now().returning(t0);

        let locator = RepoLocator::new("acme/widget".parse().unwrap(), None);
        UpdateChecker::new(
            CheckerConfig::new(locator, "1.0.7"),
            fetcher,
            runtime,
            MemoryStateStore::new(),
        )
    }
}
