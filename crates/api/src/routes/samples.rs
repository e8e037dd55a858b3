//! Rubric and code sample routes

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiResult, OptionExt};
use crate::state::AppState;
use common::models::{CodeSample, Rubric};

/// A code sample as shown to trainees, without the reference grading
#[derive(Serialize)]
pub struct SampleView {
    pub id: String,
    pub prompt: String,
    pub code: String,
}

impl From<&CodeSample> for SampleView {
    fn from(sample: &CodeSample) -> Self {
        Self {
            id: sample.id.clone(),
            prompt: sample.prompt.clone(),
            code: sample.code.clone(),
        }
    }
}

pub async fn rubric(State(state): State<Arc<AppState>>) -> Json<Rubric> {
    Json(state.handler.catalog().rubric.clone())
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<SampleView>> {
    let samples = state
        .handler
        .catalog()
        .samples
        .iter()
        .map(SampleView::from)
        .collect();
    Json(samples)
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SampleView>> {
    let sample = state
        .handler
        .catalog()
        .sample(&id)
        .not_found(format!("Sample {} not found", id))?;

    Ok(Json(SampleView::from(sample)))
}
