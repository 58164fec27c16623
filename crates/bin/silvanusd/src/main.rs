//! # silvanusd: silvanus garden daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and install logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Load the persisted settings, creating defaults on first boot
//! - Open the configured board (virtual or sysfs)
//! - Spawn the controller task and build the axum router around it
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT, `POST /system/restart`),
//!   turning the light and pump off before exiting
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

use silvanus_adapter_http_axum::state::AppState;
use silvanus_adapter_storage_sqlite_sqlx::{Config as StorageConfig, SqliteSettingsRepository};
use silvanus_adapter_sysfs::SysfsBoard;
use silvanus_adapter_virtual::VirtualBoard;
use silvanus_app::controller::{Controller, ControllerHandle};
use silvanus_app::ports::{Actuators, Sensors};
use silvanus_app::services::settings_service::SettingsService;
use silvanus_app::status_store;

use crate::config::{BoardKind, Config};

type Settings = Arc<SettingsService<SqliteSettingsRepository>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open database")?;

    // Settings
    let repo = SqliteSettingsRepository::new(db.pool().clone());
    let settings = Arc::new(
        SettingsService::load(repo)
            .await
            .context("failed to load settings")?,
    );

    // Board
    match config.board.kind {
        BoardKind::Virtual => {
            tracing::info!("using virtual board");
            serve(&config, settings, Arc::new(VirtualBoard::default())).await?;
        }
        BoardKind::Sysfs => {
            let board = SysfsBoard::open(config.sysfs())
                .await
                .context("failed to open sysfs board")?;
            serve(&config, settings, Arc::new(board)).await?;
        }
    }

    db.close().await;
    tracing::info!("silvanusd stopped");
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Run the controller and the HTTP server on `board` until asked to stop.
async fn serve<B>(config: &Config, settings: Settings, board: Arc<B>) -> anyhow::Result<()>
where
    B: Actuators + Sensors + Send + Sync + 'static,
{
    // Controller
    let (writer, reader) = status_store::channel();
    let (controller, handle) = Controller::new(
        Arc::clone(&board),
        board,
        settings.subscribe(),
        writer,
        config.controller(),
    );
    let controller_task = tokio::spawn(controller.run());

    // HTTP
    let restart = Arc::new(Notify::new());
    let state = AppState::new(settings, reader, handle.clone(), Arc::clone(&restart));
    let app = silvanus_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "silvanusd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(handle.clone(), restart))
        .await
        .context("http server failed")?;

    // Outputs go off before the process exits
    if let Err(err) = handle.shutdown().await {
        tracing::warn!(error = %err, "controller already stopped");
    }
    controller_task.await.context("controller task panicked")?;
    Ok(())
}

async fn shutdown_signal(controller: ControllerHandle, restart: Arc<Notify>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
        () = restart.notified() => tracing::info!("restart requested, shutting down"),
        () = controller.closed() => tracing::error!("controller stopped unexpectedly, shutting down"),
    }
}
