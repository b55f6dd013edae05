use anyhow::{Result, anyhow};

use crate::checker::UpdateChecker;
use crate::github::FetchRelease;
use crate::runtime::Runtime;
use crate::state::StateStore;
use crate::status::CheckOutcome;

/// Background-style check: honors the rate-limit gate and never fails.
#[tracing::instrument(skip(checker))]
pub async fn check<F: FetchRelease, R: Runtime, S: StateStore>(
    checker: &UpdateChecker<F, R, S>,
) -> Result<()> {
    let outcome = checker.trigger_check().await;
    println!("{}", outcome);

    if let CheckOutcome::Updated { .. } = outcome {
        println!("{}", checker.current_status().await);
    }
    Ok(())
}

/// User-initiated check: bypasses the gate and reports failures through the
/// exit status.
#[tracing::instrument(skip(checker))]
pub async fn force_check<F: FetchRelease, R: Runtime, S: StateStore>(
    checker: &UpdateChecker<F, R, S>,
) -> Result<()> {
    let status = checker
        .force_check()
        .await
        .map_err(|e| anyhow!("Update check for {} failed: {}", checker.locator().repo, e))?;
    println!("{}", status);
    Ok(())
}
