use tracing::debug;

use crate::{
    catalog::repo_types::{CatalogEntry, CatalogKind},
    error::AppError,
    state::AppState,
};

pub async fn list_cities(state: &AppState) -> Result<Vec<CatalogEntry>, AppError> {
    state.catalog.list(CatalogKind::City).await
}

pub async fn list_categories(state: &AppState) -> Result<Vec<CatalogEntry>, AppError> {
    state.catalog.list(CatalogKind::Category).await
}

pub async fn list_ad_types(state: &AppState) -> Result<Vec<CatalogEntry>, AppError> {
    state.catalog.list(CatalogKind::AdType).await
}

pub async fn list_ad_statuses(state: &AppState) -> Result<Vec<CatalogEntry>, AppError> {
    state.catalog.list(CatalogKind::AdStatus).await
}

/// Rejects a foreign key that points at no reference row.
pub async fn ensure_exists(
    state: &AppState,
    kind: CatalogKind,
    id: i32,
) -> Result<CatalogEntry, AppError> {
    state.catalog.find(kind, id).await?.ok_or_else(|| {
        debug!(id, kind = kind.label(), "unknown reference id");
        AppError::Validation(format!("unknown {} id {}", kind.label(), id))
    })
}

/// The status row named by `completed_status_name`, if seeded.
pub async fn completed_status(state: &AppState) -> Result<Option<CatalogEntry>, AppError> {
    state
        .catalog
        .find_by_name(CatalogKind::AdStatus, &state.config.completed_status_name)
        .await
}

/// Ids of every status row carrying the completed name.
pub async fn completed_status_ids(state: &AppState) -> Result<Vec<i32>, AppError> {
    let name = &state.config.completed_status_name;
    Ok(state
        .catalog
        .list(CatalogKind::AdStatus)
        .await?
        .into_iter()
        .filter(|s| &s.name == name)
        .map(|s| s.id)
        .collect())
}
