//! Health check routes

use axum::{extract::State, Json};
use db::ProgressionStore;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// "postgres" or "memory"
    store: &'static str,
    users: usize,
    samples: usize,
}

/// Reports the active store and fails when it cannot be read
pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let store = state.handler.store();
    let users = store.points_snapshot().await?.len();

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: store.kind(),
        users,
        samples: state.handler.catalog().samples.len(),
    }))
}
