//! Axum router wiring.
//!
//! Exposes the stats endpoint on the configured path plus `/healthz`,
//! `/readyz` and `/metrics`.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    let stats_path = state.cfg().server.path.clone();
    Router::new()
        .route(&stats_path, get(transport::http::get_stats))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
