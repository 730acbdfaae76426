//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use sweet_treats_core::{Category, CategoryGroup, Product};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Every category with its products, in display order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<CategoryGroup>> {
    Json(state.catalog().groups().to_vec())
}

/// Products of a single category.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let category = category
        .parse::<Category>()
        .map_err(|_| AppError::NotFound(format!("category {category}")))?;
    Ok(Json(state.catalog().by_category(category).to_vec()))
}

/// Case-insensitive product name search.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Product>> {
    let results = state
        .catalog()
        .search(&query.q)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    tracing::debug!(query = %query.q, results = results.len(), "Catalog search");
    Json(results)
}
