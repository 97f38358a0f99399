use async_trait::async_trait;

use crate::{
    catalog::repo_types::{CatalogEntry, CatalogKind},
    db::PgStore,
    error::AppError,
};

#[async_trait]
pub trait CatalogRepo: Send + Sync {
    /// All rows ordered by name, then id.
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, AppError>;
    async fn find(&self, kind: CatalogKind, id: i32) -> Result<Option<CatalogEntry>, AppError>;
    async fn find_by_name(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> Result<Option<CatalogEntry>, AppError>;
}

#[async_trait]
impl CatalogRepo for PgStore {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, AppError> {
        // Identifiers come from `CatalogKind`, never from input.
        let (table, id, name) = kind.columns();
        let sql = format!("SELECT {id} AS id, {name} AS name FROM {table} ORDER BY {name} ASC, {id} ASC");
        let rows = sqlx::query_as::<_, CatalogEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find(&self, kind: CatalogKind, id_value: i32) -> Result<Option<CatalogEntry>, AppError> {
        let (table, id, name) = kind.columns();
        let sql = format!("SELECT {id} AS id, {name} AS name FROM {table} WHERE {id} = $1");
        let row = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id_value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_name(
        &self,
        kind: CatalogKind,
        name_value: &str,
    ) -> Result<Option<CatalogEntry>, AppError> {
        let (table, id, name) = kind.columns();
        let sql = format!(
            "SELECT {id} AS id, {name} AS name FROM {table} WHERE {name} = $1 ORDER BY {id} LIMIT 1"
        );
        let row = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(name_value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
