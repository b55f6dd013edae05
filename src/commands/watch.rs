use anyhow::Result;
use log::info;
use std::future::Future;
use std::time::Duration;

use crate::checker::UpdateChecker;
use crate::github::FetchRelease;
use crate::runtime::Runtime;
use crate::state::StateStore;
use crate::status::CheckOutcome;

/// Runs background checks every `every` until Ctrl-C.
///
/// Each tick goes through the rate-limit gate, so ticking faster than the
/// check interval only produces skips.
#[tracing::instrument(skip(checker))]
pub async fn watch<F: FetchRelease, R: Runtime, S: StateStore>(
    checker: &UpdateChecker<F, R, S>,
    every: Duration,
) -> Result<()> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_watch(checker, every, shutdown).await
}

async fn run_watch<F: FetchRelease, R: Runtime, S: StateStore>(
    checker: &UpdateChecker<F, R, S>,
    every: Duration,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);
    info!("Watching {} every {:?}", checker.locator().repo, every);

    loop {
        match checker.trigger_check().await {
            CheckOutcome::Skipped => {}
            outcome => println!("{}", outcome),
        }

        tokio::select! {
            _ = tokio::time::sleep(every) => {}
            _ = &mut shutdown => {
                info!("Stopping watch");
                return Ok(());
            }
        }
    }
}
