// src/main.rs
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth_store::adapter::start_purge_task;
use auth_store::common::{connect_pool, migrations::run_migrations};
use auth_store::{SqliteAdapter, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    let config = StoreConfig::from_env()?;
    let pool = connect_pool(&config).await?;
    run_migrations(&pool, config.reset_db).await?;

    let adapter = SqliteAdapter::new(pool.clone());
    info!("SqliteAdapter initialized");

    // ========================================================================
    // MAINTENANCE
    // ========================================================================

    let purge_task = match config.purge_interval {
        Some(period) => {
            info!(interval_secs = period.as_secs(), "Expired row purge enabled");
            Some(start_purge_task(adapter, period))
        }
        None => {
            info!("Expired row purge disabled (PURGE_INTERVAL_SECS=0)");
            None
        }
    };

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    if let Some(task) = purge_task {
        task.abort();
    }
    pool.close().await;

    Ok(())
}
