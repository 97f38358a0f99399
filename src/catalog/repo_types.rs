use serde::Serialize;
use sqlx::FromRow;

/// One of the four read-only reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    City,
    Category,
    AdType,
    AdStatus,
}

impl CatalogKind {
    /// `(table, id column, name column)`
    pub(crate) fn columns(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::City => ("cities", "city_id", "city_name"),
            Self::Category => ("categories", "category_id", "category_name"),
            Self::AdType => ("ad_types", "type_id", "type_name"),
            Self::AdStatus => ("ad_statuses", "status_id", "status_name"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Category => "category",
            Self::AdType => "ad type",
            Self::AdStatus => "status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CatalogEntry {
    pub id: i32,
    pub name: String,
}
