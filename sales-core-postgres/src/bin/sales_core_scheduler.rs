//! sales-core-scheduler: lead lifecycle daemon
//!
//! Runs loan intent decay and public sea migration against PostgreSQL on a
//! fixed interval until interrupted.
//!
//! ## Configuration
//! - SALES_CORE_CONFIG: YAML config file (default `sales-core.yaml`)
//! - DATABASE_URL: overrides `database.url`
//! - SALES_CORE_LOG: tracing filter directives (default "info")

use std::sync::Arc;
use tracing::{error, info, warn};

use sales_core_api::config::SalesCoreConfig;
use sales_core_api::scheduler::LifecycleScheduler;
use sales_core_api::telemetry;
use sales_core_postgres::PostgresUnitOfWork;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = SalesCoreConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Starting sales-core-scheduler");

    let store = PostgresUnitOfWork::connect(&config.database).await?;
    if config.database.run_migrations {
        store.migrate().await?;
        info!("Migrations applied");
    }

    if !config.scheduler.enabled {
        warn!("Scheduler disabled by configuration, nothing to do");
        store.close().await;
        return Ok(());
    }

    let interval = config.scheduler.interval();
    info!(interval_secs = interval.as_secs(), "Lifecycle scheduler running");
    let handle = LifecycleScheduler::new(Arc::new(store.clone()), interval).start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    handle.stop().await;
    store.close().await;
    Ok(())
}
