mod bot;
mod config;
mod registry;
mod sequencer;
mod server;
mod state;
mod types;
mod web;

use anyhow::Result;

use crate::bot::ChainOps;

/// How often to re-read the contract balance fields while a wallet is
/// configured. Actions also refresh on completion; this catches movements
/// made outside the console.
const BALANCE_SYNC_INTERVAL_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.parse().unwrap_or_default()),
        )
        .with_target(false)
        .init();

    let registry = registry::Registry::load(&config.contracts_dir)?;
    let port = config.http_port;

    tracing::info!(
        chain_id = config.chain_id,
        rpc = %config.rpc_url,
        wallet = config.has_wallet(),
        port,
        "tradingbot-console starting"
    );
    if !registry.supports_chain(config.chain_id) {
        tracing::warn!(
            chain_id = config.chain_id,
            "no contracts registered for this chain — actions will fail until it is changed"
        );
    }

    let app_state = state::AppState::new(config, registry);

    // First tick fires immediately, covering the balance read the page does
    // when a session is already configured at startup.
    {
        let sync_state = app_state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(
                BALANCE_SYNC_INTERVAL_SECS,
            ));
            loop {
                interval.tick().await;
                let config = sync_state.config.read().unwrap().clone();
                if !config.has_wallet() {
                    continue;
                }
                let chain = bot::RpcChain::new(config, sync_state.registry.clone());
                match chain.balances().await {
                    Ok(snapshot) => {
                        sync_state.set_balances(snapshot);
                        tracing::debug!(
                            staking = %snapshot.staking,
                            funding = %snapshot.funding,
                            "periodic balance sync"
                        );
                    }
                    Err(e) => tracing::warn!(error = %e, "periodic balance sync failed"),
                }
            }
        });
    }

    let router = server::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("HTTP server listening on 0.0.0.0:{port}");
    tracing::info!("open http://localhost:{port} in your browser");

    axum::serve(listener, router).await?;

    Ok(())
}
