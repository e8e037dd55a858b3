//! API routes

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

pub mod badges;
pub mod health;
pub mod leaderboard;
pub mod samples;
pub mod users;

/// Build the API router with state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/rubric", get(samples::rubric))
        .route("/api/samples", get(samples::list))
        .route("/api/samples/:id", get(samples::get))
        .route("/api/badges", get(badges::list))
        .route("/api/users", post(users::login))
        .route("/api/users/:user_id", get(users::get))
        .route("/api/users/:user_id/history", get(users::history))
        .route("/api/users/:user_id/export", get(users::export))
        .route("/api/users/:user_id/submissions", post(users::submit))
        .route("/api/leaderboard", get(leaderboard::global))
        .with_state(state)
}
