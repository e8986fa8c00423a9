//! Twine Remote Control
//!
//! Receives a payload over HTTP, stores it in a file and runs the Twine
//! ingester against it, answering with the command's output.

use anyhow::{Context, Result};
use tracing::info;
use twine_remote::{config::RemoteConfig, routes, telemetry, AppState};
use twine_remote_domain::IngestionService;
use twine_remote_process::{FilePayloadStore, ProcessIngestRunner};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = RemoteConfig::from_env().context("Invalid configuration")?;

    telemetry::init_tracing(config.log_format);

    info!(
        program = %config.command.program(),
        data_dir = %config.data_dir.display(),
        "Starting Twine remote control"
    );

    let store = FilePayloadStore::new(&config.data_dir);
    let runner = ProcessIngestRunner::new(config.timeout, config.max_concurrent_ingests);
    let service = IngestionService::new(store, runner, config.ingestion_config());

    let app = routes::create_router(AppState::new(service));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(addr = %addr, "Server Started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down server");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
