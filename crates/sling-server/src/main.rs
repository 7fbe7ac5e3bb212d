//! Main entry point for the Sling lock server.

use std::sync::Arc;

use sling_common::logging::init_logging;
use sling_core::LockManager;
use sling_server::{metrics, model::Configuration, startup};
use sling_store::{LockStore, MemoryLockStore};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let metrics_handle = if configuration.metrics_enabled() {
        Some(metrics::install_recorder()?)
    } else {
        None
    };

    let tables = configuration.tables();
    let store: Arc<dyn LockStore> = Arc::new(MemoryLockStore::with_tables(&tables));
    info!(
        tables = ?tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        "Lock store ready"
    );

    let manager = LockManager::new(store);
    let (server, addrs) = startup::lock_server(
        manager,
        metrics_handle,
        configuration.context_path(),
        configuration.server_address(),
        configuration.server_port(),
    )?;
    info!(?addrs, "Sling lock server listening");

    server.await?;
    info!("Sling lock server stopped");
    Ok(())
}
