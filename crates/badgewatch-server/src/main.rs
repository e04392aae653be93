mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use badgewatch_pipeline::{JsonFileResultStore, LocalFileStore, RunCoordinator, RunSettings};
use badgewatch_spapi::{CatalogClient, LwaClient, SpApiChecker};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = badgewatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let auth = LwaClient::with_token_url(
        config.lwa.clone(),
        config.request_timeout_secs,
        &config.lwa_token_url,
    )?;
    let catalog = CatalogClient::with_base_url(config.request_timeout_secs, &config.api_host)?;
    let checker = Arc::new(SpApiChecker::new(
        auth,
        catalog,
        config.marketplace_id.clone(),
    ));

    let files = Arc::new(LocalFileStore::new(config.data_dir.clone()));
    let results = Arc::new(JsonFileResultStore::new(config.result_path.clone()));

    let coordinator = RunCoordinator::new(
        checker,
        Arc::clone(&files) as _,
        results,
        RunSettings {
            source_name: config.source_name.clone(),
            batch_size: config.batch_size,
            batch_concurrency: config.batch_concurrency,
            report_unchanged: config.report_unchanged,
        },
    );
    coordinator.recover().await;

    let app = build_app(AppState {
        coordinator,
        files,
        source_name: config.source_name.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "badgewatch server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
