use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    catalog::{repo_types::CatalogEntry, services},
    error::AppError,
    state::AppState,
};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog/cities", get(cities))
        .route("/catalog/categories", get(categories))
        .route("/catalog/ad-types", get(ad_types))
        .route("/catalog/ad-statuses", get(ad_statuses))
}

#[instrument(skip(state))]
pub async fn cities(State(state): State<AppState>) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    Ok(Json(services::list_cities(&state).await?))
}

#[instrument(skip(state))]
pub async fn categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    Ok(Json(services::list_categories(&state).await?))
}

#[instrument(skip(state))]
pub async fn ad_types(State(state): State<AppState>) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    Ok(Json(services::list_ad_types(&state).await?))
}

#[instrument(skip(state))]
pub async fn ad_statuses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    Ok(Json(services::list_ad_statuses(&state).await?))
}
