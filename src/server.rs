use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use url::Url;

use crate::bot::{self, ChainOps, RpcChain};
use crate::sequencer::{self, SequenceError};
use crate::state::AppState;
use crate::types::ActionKind;
use crate::web;

type S = Arc<AppState>;

pub fn build_router(state: S) -> Router {
    Router::new()
        .route("/", get(serve_ui))
        .route("/api/status", get(get_status))
        .route("/api/events", get(get_events))
        .route("/api/wallet", post(post_wallet))
        .route("/api/stake", post(post_stake))
        .route("/api/fund", post(post_fund))
        .route("/api/unstake", post(post_unstake))
        .route("/api/withdraw-funds", post(post_withdraw_funds))
        .route("/api/refresh-balances", post(post_refresh_balances))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── UI ──────────────────────────────────────────────────────────────────────

async fn serve_ui() -> axum::response::Html<&'static str> {
    axum::response::Html(web::INDEX_HTML)
}

// ── Status ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StatusResponse {
    wallet_set: bool,
    address: Option<String>,
    chain_id: u64,
    chain_supported: bool,
    staking_balance: Decimal,
    funding_balance: Decimal,
    staking_status: String,
    funding_status: String,
    withdraw_staking_status: String,
    withdraw_funding_status: String,
}

async fn get_status(State(state): State<S>) -> Json<StatusResponse> {
    let config = state.config.read().unwrap().clone();
    let status = state.status.read().unwrap().clone();
    let balances = state.balances();

    let address = if config.has_wallet() {
        bot::wallet_address(&config)
            .ok()
            .map(|a| ethers::utils::to_checksum(&a, None))
    } else {
        None
    };

    Json(StatusResponse {
        wallet_set: config.has_wallet(),
        address,
        chain_id: config.chain_id,
        chain_supported: state.registry.supports_chain(config.chain_id),
        staking_balance: balances.staking,
        funding_balance: balances.funding,
        staking_status: status.staking,
        funding_status: status.funding,
        withdraw_staking_status: status.withdraw_staking,
        withdraw_funding_status: status.withdraw_funding,
    })
}

async fn get_events(State(state): State<S>) -> Json<Vec<crate::state::EventEntry>> {
    let events = state.events.lock().unwrap();
    Json(events.iter().cloned().collect())
}

// ── Wallet ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WalletRequest {
    private_key: Option<String>,
    rpc_url: Option<String>,
    chain_id: Option<u64>,
}

async fn post_wallet(
    State(state): State<S>,
    Json(body): Json<WalletRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    if let Some(v) = &body.rpc_url {
        Url::parse(v).map_err(|_| (StatusCode::BAD_REQUEST, "invalid RPC URL".to_string()))?;
    }

    {
        let mut config = state.config.write().unwrap();
        if let Some(v) = body.private_key {
            config.private_key = v;
        }
        if let Some(v) = body.rpc_url {
            config.rpc_url = v;
        }
        if let Some(v) = body.chain_id {
            config.chain_id = v;
        }
    }

    let config = state.config.read().unwrap().clone();
    if !config.has_wallet() {
        return Err((StatusCode::BAD_REQUEST, "private key not set".to_string()));
    }
    let address = bot::wallet_address(&config)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid private key: {e}")))?;
    config.persist();

    let checksummed = ethers::utils::to_checksum(&address, None);
    state.push_event("wallet", &format!("wallet configured: {checksummed}"));

    // first balance read, same as the page does when a session appears
    let chain = RpcChain::new(config, state.registry.clone());
    sequencer::refresh_balances(&state, &chain).await;

    Ok(Json(serde_json::json!({"ok": true, "address": checksummed})))
}

// ── Actions ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AmountRequest {
    amount: String,
}

async fn run_action(
    state: &S,
    action: ActionKind,
    amount: Option<&str>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let config = state.config.read().unwrap().clone();
    if !config.has_wallet() {
        return Err((StatusCode::BAD_REQUEST, "wallet not configured".to_string()));
    }

    let chain = RpcChain::new(config, state.registry.clone());
    match sequencer::run(state, &chain, action, amount).await {
        Ok(()) => Ok(Json(serde_json::json!({"ok": true, "status": state.status(action)}))),
        Err(SequenceError::Rejected(msg)) => Err((StatusCode::BAD_REQUEST, msg)),
        Err(SequenceError::Chain(e)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{action} failed: {e}"),
        )),
    }
}

async fn post_stake(
    State(state): State<S>,
    Json(body): Json<AmountRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    run_action(&state, ActionKind::Stake, Some(&body.amount)).await
}

async fn post_fund(
    State(state): State<S>,
    Json(body): Json<AmountRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    run_action(&state, ActionKind::Fund, Some(&body.amount)).await
}

async fn post_unstake(
    State(state): State<S>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    run_action(&state, ActionKind::Unstake, None).await
}

async fn post_withdraw_funds(
    State(state): State<S>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    run_action(&state, ActionKind::WithdrawFunds, None).await
}

// ── Balances ────────────────────────────────────────────────────────────────

async fn post_refresh_balances(
    State(state): State<S>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let config = state.config.read().unwrap().clone();
    if !config.has_wallet() {
        return Err((StatusCode::BAD_REQUEST, "wallet not configured".to_string()));
    }

    let chain = RpcChain::new(config, state.registry.clone());
    match chain.balances().await {
        Ok(snapshot) => {
            state.set_balances(snapshot);
            Ok(Json(serde_json::json!({
                "ok": true,
                "staking": snapshot.staking,
                "funding": snapshot.funding,
            })))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("balance read failed: {e}"),
        )),
    }
}
