mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use snaplink_analytics::AnalyticsService;
use snaplink_core::SlugStore;
use snaplink_gateway::{App, AppState};
use snaplink_generator::RandomGenerator;
use snaplink_registry::{RegistryService, RegistrySettings};
use snaplink_storage::{InMemorySlugStore, MySqlSlugStore};
use snaplink_telemetry::DEFAULT_DIRECTIVE;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    snaplink_telemetry::init(config.log_format.into(), DEFAULT_DIRECTIVE)?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(&config, Arc::new(InMemorySlugStore::new())).await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlSlugStore::connect(mysql_dsn).await?;
            store.migrate().await?;
            run_server(&config, Arc::new(store)).await?;
        }
    }

    Ok(())
}

async fn run_server<S: SlugStore>(config: &CLI, store: Arc<S>) -> anyhow::Result<()> {
    let settings = RegistrySettings::builder()
        .max_generation_attempts(config.max_generation_attempts)
        .store_timeout(config.store_timeout())
        .build();
    let store_timeout = settings.store_timeout();

    let registry =
        RegistryService::with_settings(Arc::clone(&store), RandomGenerator::new(), settings);
    let analytics = AnalyticsService::with_timeout(store, store_timeout);
    let state = AppState::new(
        Arc::new(registry),
        Arc::new(analytics),
        config.public_base_url.clone(),
    );

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler the server runs until killed.
        std::future::pending::<()>().await;
    }
}
