use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use hookrelay_core::accounts::AccountRegistry;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hookrelay_api::background::log_retention;
use hookrelay_api::config::ServerConfig;
use hookrelay_api::forward::Forwarder;
use hookrelay_api::router::build_app_router;
use hookrelay_api::state::AppState;
use hookrelay_api::store::connect_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hookrelay_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let accounts = AccountRegistry::from_env_vars(std::env::vars());
    let names: Vec<&str> = accounts.names().collect();
    tracing::info!(
        configured = accounts.configured_count(),
        ?names,
        "Loaded destination accounts"
    );
    if accounts.configured_count() == 0 {
        tracing::warn!(
            "No WEBHOOK_<ACCOUNT> destinations configured, every relay will be rejected"
        );
    }

    // --- Outbound HTTP ---
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.forward_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    // --- Log store ---
    let store = connect_store(&config.store, client.clone()).await?;

    // --- Retention sweep ---
    let sweep_cancel = CancellationToken::new();
    let sweep_handle = config.sweep_interval_secs.map(|secs| {
        tokio::spawn(log_retention::run(
            Arc::clone(&store),
            Duration::from_secs(secs),
            sweep_cancel.clone(),
        ))
    });

    // --- App state ---
    let state = AppState {
        accounts: Arc::new(accounts),
        forwarder: Forwarder::new(client),
        store,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    if let Some(handle) = sweep_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Log retention job stopped");
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
