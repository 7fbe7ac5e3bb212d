//! Periodic trigger and shutdown handling

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Start `job` immediately and then every `every` until `shutdown` resolves.
///
/// Each tick runs as its own task, so a slow run does not delay the next
/// one. In-flight runs are awaited before returning. Returns the number of
/// runs started.
pub async fn run_periodically<F, Fut, S>(every: Duration, job: F, shutdown: S) -> usize
where
    F: Fn() -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
    S: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut runs = JoinSet::new();
    let mut started = 0usize;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                started += 1;
                runs.spawn(job());
            }
            Some(joined) = runs.join_next(), if !runs.is_empty() => {
                if let Err(e) = joined {
                    error!("Merge run task aborted: {}", e);
                }
            }
        }
    }

    if !runs.is_empty() {
        info!(in_flight = runs.len(), "Waiting for in-flight runs to finish");
    }
    while let Some(joined) = runs.join_next().await {
        if let Err(e) = joined {
            warn!("Merge run task aborted during shutdown: {}", e);
        }
    }
    started
}
