//! Main entry point for the Sling merge orchestrator.

use clap::Parser;
use sling_common::logging::init_logging;
use sling_orchestrator::config::Cli;
use sling_orchestrator::{MergeBot, OrchestratorConfig, scheduler};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = OrchestratorConfig::load(&cli.config)?;

    let _logging_guard = init_logging(&config.logging_config())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let interval = config.run_interval();
    let bot = MergeBot::from_config(config)?;
    info!(
        repo = %format!("{}/{}", bot.config().repo_owner, bot.config().repo_name),
        lock = %bot.config().lock_name,
        "Sling orchestrator starting"
    );

    if cli.once {
        bot.run_once().await;
        return Ok(());
    }

    info!(?interval, "Scheduling merge runs");
    let runs = scheduler::run_periodically(
        interval,
        move || {
            let bot = bot.clone();
            async move { bot.run_once().await }
        },
        scheduler::shutdown_signal(),
    )
    .await;
    info!(runs, "Sling orchestrator stopped");
    Ok(())
}
