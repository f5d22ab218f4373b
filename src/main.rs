mod api;
mod config;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::storage::CovidStore;
use axum::{ServiceExt, extract::Request};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(filter)
        .init();

    info!("🚀 Starting COVID-19 India API Server");

    let config = AppConfig::load()?;
    info!(
        database = %config.storage.database_path.display(),
        addr = %config.server.addr(),
        "📋 Configuration loaded"
    );

    // The database must already exist; there is no retry.
    let store = match CovidStore::open(&config.storage.database_path) {
        Ok(store) => store,
        Err(e) => {
            error!("Error initializing DB or Server: {}", e);
            std::process::exit(1);
        }
    };
    info!("✅ Database ready ({} states)", store.count_states().await?);

    let addr = config.server.addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Error initializing DB or Server: {}", e);
            std::process::exit(1);
        }
    };

    info!("🌐 Server running and listening on http://{}", addr);
    info!("📡 GET /states/ | GET /states/{{stateId}} | GET /states/{{stateId}}/stats");
    info!("📡 POST /districts | GET, PUT, DELETE /districts/{{districtId}}");
    info!("📡 GET /districts/{{districtId}}/details | GET /health");

    let app = api::app(AppState { store });
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it.
///
/// A signal that cannot be installed is logged and never fires.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("🛑 Ctrl+C received"),
        () = sigterm => info!("🛑 SIGTERM received"),
    }
}
