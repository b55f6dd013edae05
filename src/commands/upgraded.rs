use anyhow::{Result, bail};

use crate::checker::UpdateChecker;
use crate::github::FetchRelease;
use crate::runtime::Runtime;
use crate::state::StateStore;

/// Tells the checker the host finished installing `version`.
#[tracing::instrument(skip(checker))]
pub async fn upgraded<F: FetchRelease, R: Runtime, S: StateStore>(
    checker: &UpdateChecker<F, R, S>,
    version: &str,
) -> Result<()> {
    let version = version.trim();
    if version.is_empty() {
        bail!("Version must not be empty");
    }

    checker.record_upgrade(version).await;
    println!("Recorded upgrade of {} to {}", checker.locator().repo, version);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{checker, record};
    use crate::github::MockFetchRelease;

    #[tokio::test]
    async fn test_upgraded_clears_pending_update() {
        let mut fetcher = MockFetchRelease::new();
        fetcher
            .expect_fetch()
            .times(2)
            .returning(|_| Ok(record("1.0.8")));
        let checker = checker(fetcher);

        assert!(checker.current_status().await.available);
        upgraded(&checker, " 1.0.8 ").await.unwrap();

        let status = checker.current_status().await;
        assert_eq!(status.installed_version, "1.0.8");
        assert!(!status.available);
    }

    #[tokio::test]
    async fn test_upgraded_rejects_empty_version() {
        let mut fetcher = MockFetchRelease::new();
        fetcher.expect_fetch().never();

        assert!(upgraded(&checker(fetcher), "").await.is_err());
    }
}
