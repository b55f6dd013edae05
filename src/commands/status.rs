use anyhow::{Context, Result};

use crate::checker::UpdateChecker;
use crate::github::FetchRelease;
use crate::runtime::Runtime;
use crate::state::StateStore;

#[tracing::instrument(skip(checker))]
pub async fn status<F: FetchRelease, R: Runtime, S: StateStore>(
    checker: &UpdateChecker<F, R, S>,
    json: bool,
) -> Result<()> {
    let status = checker.current_status().await;

    if json {
        let text = serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
        println!("{}", text);
        return Ok(());
    }

    println!("Repository:        {}", checker.locator().repo);
    println!("{}", status);
    match checker.last_check_at().await {
        Some(at) => println!("Last checked:      {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last checked:      never"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{checker, record};
    use crate::github::MockFetchRelease;

    #[tokio::test]
    async fn test_status_fetches_once() {
        let mut fetcher = MockFetchRelease::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(record("1.0.8")));
        let checker = checker(fetcher);

        status(&checker, false).await.unwrap();
        status(&checker, true).await.unwrap();

        assert!(checker.current_status().await.available);
    }
}
