//! Badge routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use common::models::{Badge, BadgeCategory};

/// Grouped badges for the catalog
#[derive(Serialize)]
pub struct BadgeCatalog {
    pub total: usize,
    pub categories: Vec<CategoryGroup>,
}

#[derive(Serialize)]
pub struct CategoryGroup {
    pub name: &'static str,
    pub badges: Vec<Badge>,
}

/// List all badges (catalog)
pub async fn list(State(state): State<Arc<AppState>>) -> Json<BadgeCatalog> {
    let catalog = state.handler.catalog();

    let categories: Vec<CategoryGroup> = BadgeCategory::ALL
        .iter()
        .map(|&category| CategoryGroup {
            name: category.as_str(),
            badges: catalog.badges_in(category).cloned().collect(),
        })
        .filter(|c| !c.badges.is_empty())
        .collect();

    Json(BadgeCatalog {
        total: catalog.badges.len(),
        categories,
    })
}
