//! User routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;
use common::models::{AccuracyRecord, RubricScoreSet, UserProgress};
use processor::handler::{Profile, ProfileExport};
use processor::{Submission, SubmissionOutcome};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub sample_id: String,
    pub scores: RubricScoreSet,
    #[serde(default)]
    pub feedback: Vec<String>,
}

/// Log in, creating the trainee on first visit
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<UserProgress>> {
    let progress = state.handler.login(&body.user_id).await?;
    Ok(Json(progress))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    let profile = state.handler.profile(&user_id).await?;
    Ok(Json(profile))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<AccuracyRecord>>> {
    let history = state.handler.accuracy_history(&user_id).await?;
    Ok(Json(history))
}

pub async fn export(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ProfileExport>> {
    let export = state.handler.export(&user_id).await?;
    Ok(Json(export))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<SubmissionOutcome>)> {
    let submission = Submission {
        user_id,
        sample_id: body.sample_id,
        scores: body.scores,
        feedback: body.feedback,
    };
    let outcome = state.handler.submit(submission).await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}
