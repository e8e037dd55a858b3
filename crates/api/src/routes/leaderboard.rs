//! Leaderboard routes

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;
use common::models::LeaderboardRow;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    /// Defaults to the configured leaderboard limit
    limit: Option<usize>,
}

pub async fn global(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<LeaderboardRow>>> {
    let limit = query.limit.unwrap_or(state.config.leaderboard_limit);
    let leaderboard = state.handler.leaderboard(limit).await?;

    Ok(Json(leaderboard))
}
