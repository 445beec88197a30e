mod background;
mod config;
mod constants;
mod handlers;
mod models;
mod server;
mod state;
mod upstream;
mod util;

#[cfg(test)]
mod tests;

use std::env;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use rustls::crypto::ring::default_provider;
use rustls::crypto::CryptoProvider;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::background::{run_fleet_metrics, run_status_poller};
use crate::config::Config;
use crate::constants::DEFAULT_STATIC_DIR;
use crate::server::build_router;
use crate::state::AppState;
use crate::upstream::StatusClient;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resolver_dashboard=info".into()),
        )
        .init();

    CryptoProvider::install_default(default_provider())
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    let config = Config::from_env()?;
    let client = StatusClient::new(config.upstream_url.clone(), config.request_timeout)?;
    let state = AppState::new(config.clone(), client);

    let disable_background = env::var("DISABLE_BACKGROUND_TASKS")
        .map(|value| {
            let trimmed = value.trim();
            !trimmed.is_empty() && trimmed != "0"
        })
        .unwrap_or(false);

    if disable_background {
        warn!("background tasks disabled via DISABLE_BACKGROUND_TASKS");
    } else {
        info!(
            upstream = %config.upstream_url,
            interval_ms = config.poll.interval_ms,
            layout = config.layout.as_str(),
            "polling status feed"
        );
        tokio::spawn(run_status_poller(Arc::clone(&state)));
        tokio::spawn(run_fleet_metrics(Arc::clone(&state)));
    }

    let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());

    let app = build_router(Arc::clone(&state), static_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("resolver-dashboard listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(Arc::clone(&state)))
    .await
    .context("server error")?;

    Ok(())
}

async fn shutdown_signal(state: Arc<AppState>) {
    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = unix_signal(SignalKind::terminate(), "SIGTERM") => {},
            _ = unix_signal(SignalKind::quit(), "SIGQUIT") => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    let snapshot = state.latest_snapshot().await;
    info!(
        nodes = snapshot.as_ref().map(|entry| entry.payload.len()).unwrap_or(0),
        snapshot_ts = snapshot.as_ref().map(|entry| entry.ts_ms).unwrap_or(0),
        fetch_failures = state.fetch_failures.load(Ordering::SeqCst),
        "shutdown signal received; stopping relay"
    );
}

/// Resolves on the given signal; never resolves if the handler cannot be
/// installed.
#[cfg(unix)]
async fn unix_signal(kind: SignalKind, name: &str) {
    match signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            warn!(?err, signal = name, "failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}
