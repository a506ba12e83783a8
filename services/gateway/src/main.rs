mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use anyhow::Context;
use config::Config;
use match_engine::collaborator::rpc::{JsonRpcClient, RpcNeedsDirectory, RpcOfferCatalog};
use match_engine::{MatchEngine, SyncLoop};
use router::create_router;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "gateway=info,match_engine=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    tracing::info!(
        needs = %config.needs_rpc_url,
        offers = %config.offers_rpc_url,
        supply = %config.supply_rpc_url,
        emit_policy = ?config.emit_policy,
        fulfillment_enabled = config.fulfillment_enabled,
        "Starting match engine"
    );

    let http = reqwest::Client::builder()
        .timeout(config.call_timeout)
        .build()
        .context("failed to build HTTP client")?;

    let needs = Arc::new(RpcNeedsDirectory::new(JsonRpcClient::new(
        http.clone(),
        config.needs_rpc_url.clone(),
    )));
    let offers = Arc::new(RpcOfferCatalog::new(
        JsonRpcClient::new(http.clone(), config.offers_rpc_url.clone()),
        JsonRpcClient::new(http, config.supply_rpc_url.clone()),
    ));
    let engine = MatchEngine::new(config.engine_config(), needs, offers);

    let cancel = CancellationToken::new();
    let sync = SyncLoop::new(engine, cancel.clone());
    let state = AppState::new(sync.engine().store(), sync.engine().scorer(), sync.subscribe());
    let sync_handle = sync.spawn();

    tokio::spawn(shutdown_signal(cancel.clone()));

    let app = create_router(state);
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("Listening on {}", config.bind_addr);
    let server_cancel = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_cancel.cancelled().await })
        .await?;

    // Server may stop on its own; make sure the loop follows
    cancel.cancel();
    let engine = sync_handle.await.context("sync loop task failed")?;
    tracing::info!(cycles = engine.store().cycle(), "Match engine stopped");

    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
    cancel.cancel();
}
