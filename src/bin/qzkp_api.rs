//! qzkp_api: a minimal REST façade over the prover/verifier core.
//!
//! Endpoints:
//! - GET  /v1/health                      -> { ok: true }
//! - POST /v1/prove   { data_hex, dimension, identifier, key_hex, security_level } -> Proof (JSON)
//! - POST /v1/verify  { proof, key_hex }                                         -> { valid: bool }
//!
//! This is the minimal slice of the teacher's `tinyzkp_api.rs` relevant to
//! this protocol: multi-tenant API keys, billing, and usage metering are not
//! part of this core's external surface (see DESIGN.md).

#![forbid(unsafe_code)]
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use qzkp::{
    api::prove_bytes,
    security::SecurityLevel,
    scheduler::{Proof, Verifier},
    Id, SecretKey,
};

#[derive(Clone)]
struct AppState;

#[derive(Deserialize)]
struct ProveRequest {
    data_hex: String,
    dimension: usize,
    identifier: String,
    key_hex: String,
    security_level: u32,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

async fn prove(State(_state): State<AppState>, Json(req): Json<ProveRequest>) -> impl IntoResponse {
    let data = match hex::decode(&req.data_hex) {
        Ok(d) => d,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ErrorBody { error: format!("bad data_hex: {e}") })).into_response(),
    };
    let key_bytes = match hex::decode(&req.key_hex) {
        Ok(k) => k,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ErrorBody { error: format!("bad key_hex: {e}") })).into_response(),
    };
    let level = match SecurityLevel::new(req.security_level) {
        Ok(l) => l,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ErrorBody { error: e.to_string() })).into_response(),
    };

    let key = SecretKey::from_bytes(&key_bytes);
    let id = Id::from(req.identifier.as_str());

    match prove_bytes(&data, req.dimension, &id, &key, level) {
        Ok(proof) => Json(proof).into_response(),
        Err(e) => {
            error!(error = %e, "prove failed");
            (StatusCode::BAD_REQUEST, Json(ErrorBody { error: e.to_string() })).into_response()
        }
    }
}

#[derive(Deserialize)]
struct VerifyRequest {
    proof: Proof,
    key_hex: String,
}

#[derive(Serialize)]
struct VerifyResponse {
    valid: bool,
}

async fn verify(State(_state): State<AppState>, Json(req): Json<VerifyRequest>) -> impl IntoResponse {
    let key_bytes = match hex::decode(&req.key_hex) {
        Ok(k) => k,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ErrorBody { error: format!("bad key_hex: {e}") })).into_response(),
    };
    let key = SecretKey::from_bytes(&key_bytes);
    let valid = Verifier::new().verify(&req.proof, &key);
    Json(VerifyResponse { valid }).into_response()
}

fn app() -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/prove", post(prove))
        .route("/v1/verify", post(verify))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let addr: SocketAddr = std::env::var("QZKP_API_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

    info!(%addr, "starting qzkp_api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_builds() {
        let _ = app();
    }
}
