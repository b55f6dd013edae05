use anyhow::Result;

use crate::checker::UpdateChecker;
use crate::github::FetchRelease;
use crate::runtime::Runtime;
use crate::state::StateStore;

/// Default number of entries shown by `relcheck logs`.
pub const DEFAULT_LOG_LINES: usize = 20;

#[tracing::instrument(skip(checker))]
pub async fn logs<F: FetchRelease, R: Runtime, S: StateStore>(
    checker: &UpdateChecker<F, R, S>,
    lines: usize,
) -> Result<()> {
    let entries = checker.get_recent_logs(lines).await;
    if entries.is_empty() {
        println!("No log entries.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::checker;
    use crate::github::MockFetchRelease;

    #[tokio::test]
    async fn test_logs_never_fetches() {
        let mut fetcher = MockFetchRelease::new();
        fetcher.expect_fetch().never();
        let checker = checker(fetcher);

        logs(&checker, DEFAULT_LOG_LINES).await.unwrap();
        checker.record_upgrade("1.0.8").await;
        logs(&checker, 1).await.unwrap();

        assert_eq!(checker.get_recent_logs(DEFAULT_LOG_LINES).await.len(), 1);
    }
}
