use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    ads::{
        filter::ListingFilter,
        repo_types::{Ad, CompletedRow, ListingRow, MyAdRow, NewAd},
    },
    db::PgStore,
    error::AppError,
};

/// Merges changes into a loaded ad, or rejects them.
pub type ApplyChanges<'a> = &'a (dyn Fn(Ad) -> Result<Ad, AppError> + Send + Sync);

#[async_trait]
pub trait AdRepo: Send + Sync {
    async fn insert(&self, ad: NewAd) -> Result<Ad, AppError>;
    async fn find_owned(&self, ad_id: i32, owner: i32) -> Result<Option<Ad>, AppError>;
    /// Loads, applies and stores as one unit. `NotFound` when the ad is
    /// absent or owned by someone else; nothing is written if `apply` fails.
    async fn update_owned(
        &self,
        ad_id: i32,
        owner: i32,
        apply: ApplyChanges<'_>,
    ) -> Result<Ad, AppError>;
    /// Returns whether a row was removed.
    async fn delete_owned(&self, ad_id: i32, owner: i32) -> Result<bool, AppError>;
    async fn list_by_owner(&self, owner: i32) -> Result<Vec<MyAdRow>, AppError>;
    /// Newest first, ties by id.
    async fn search(&self, filter: &ListingFilter) -> Result<Vec<ListingRow>, AppError>;
    async fn completed_for(
        &self,
        owner: i32,
        completed_status_name: &str,
    ) -> Result<Vec<CompletedRow>, AppError>;
}

fn not_found(ad_id: i32) -> AppError {
    AppError::NotFound(format!("ad {ad_id} not found"))
}

#[async_trait]
impl AdRepo for PgStore {
    async fn insert(&self, ad: NewAd) -> Result<Ad, AppError> {
        let row = sqlx::query_as::<_, Ad>(
            r#"
            INSERT INTO ads (user_id, title, description, price, post_date, image_path,
                             city_id, category_id, type_id, status_id, profit_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING ad_id, user_id, title, description, price, post_date, image_path,
                      city_id, category_id, type_id, status_id, profit_amount
            "#,
        )
        .bind(ad.user_id)
        .bind(ad.title)
        .bind(ad.description)
        .bind(ad.price)
        .bind(ad.post_date)
        .bind(ad.image_path)
        .bind(ad.city_id)
        .bind(ad.category_id)
        .bind(ad.type_id)
        .bind(ad.status_id)
        .bind(ad.profit_amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_owned(&self, ad_id: i32, owner: i32) -> Result<Option<Ad>, AppError> {
        let row = sqlx::query_as::<_, Ad>(
            r#"
            SELECT ad_id, user_id, title, description, price, post_date, image_path,
                   city_id, category_id, type_id, status_id, profit_amount
            FROM ads
            WHERE ad_id = $1 AND user_id = $2
            "#,
        )
        .bind(ad_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_owned(
        &self,
        ad_id: i32,
        owner: i32,
        apply: ApplyChanges<'_>,
    ) -> Result<Ad, AppError> {
        // Dropping `tx` without commit rolls back.
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Ad>(
            r#"
            SELECT ad_id, user_id, title, description, price, post_date, image_path,
                   city_id, category_id, type_id, status_id, profit_amount
            FROM ads
            WHERE ad_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(ad_id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found(ad_id))?;

        let next = apply(current)?;

        let updated = sqlx::query_as::<_, Ad>(
            r#"
            UPDATE ads
               SET title = $3, description = $4, price = $5, image_path = $6,
                   city_id = $7, category_id = $8, type_id = $9, status_id = $10,
                   profit_amount = $11
             WHERE ad_id = $1 AND user_id = $2
            RETURNING ad_id, user_id, title, description, price, post_date, image_path,
                      city_id, category_id, type_id, status_id, profit_amount
            "#,
        )
        .bind(ad_id)
        .bind(owner)
        .bind(next.title)
        .bind(next.description)
        .bind(next.price)
        .bind(next.image_path)
        .bind(next.city_id)
        .bind(next.category_id)
        .bind(next.type_id)
        .bind(next.status_id)
        .bind(next.profit_amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_owned(&self, ad_id: i32, owner: i32) -> Result<bool, AppError> {
        let res = sqlx::query(r#"DELETE FROM ads WHERE ad_id = $1 AND user_id = $2"#)
            .bind(ad_id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner: i32) -> Result<Vec<MyAdRow>, AppError> {
        let rows = sqlx::query_as::<_, MyAdRow>(
            r#"
            SELECT a.ad_id, a.title, a.price, a.post_date, s.status_name
              FROM ads a
              JOIN ad_statuses s ON s.status_id = a.status_id
             WHERE a.user_id = $1
             ORDER BY a.post_date DESC, a.ad_id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search(&self, filter: &ListingFilter) -> Result<Vec<ListingRow>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT a.ad_id, a.title, a.description, a.price, a.post_date, a.image_path,
                   a.city_id, a.category_id, a.type_id, a.status_id,
                   c.city_name, cat.category_name, t.type_name, s.status_name
              FROM ads a
              JOIN cities c ON c.city_id = a.city_id
              JOIN categories cat ON cat.category_id = a.category_id
              JOIN ad_types t ON t.type_id = a.type_id
              JOIN ad_statuses s ON s.status_id = a.status_id
             WHERE TRUE"#,
        );
        filter.push_predicates(&mut qb);
        qb.push(" ORDER BY a.post_date DESC, a.ad_id ASC");

        let rows = qb
            .build_query_as::<ListingRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn completed_for(
        &self,
        owner: i32,
        completed_status_name: &str,
    ) -> Result<Vec<CompletedRow>, AppError> {
        let rows = sqlx::query_as::<_, CompletedRow>(
            r#"
            SELECT a.ad_id, a.title, a.description, a.price, a.post_date, a.profit_amount,
                   c.city_name, cat.category_name, t.type_name
              FROM ads a
              JOIN ad_statuses s ON s.status_id = a.status_id
              JOIN cities c ON c.city_id = a.city_id
              JOIN categories cat ON cat.category_id = a.category_id
              JOIN ad_types t ON t.type_id = a.type_id
             WHERE a.user_id = $1
               AND s.status_name = $2
               AND a.profit_amount IS NOT NULL
             ORDER BY a.post_date DESC, a.ad_id ASC
            "#,
        )
        .bind(owner)
        .bind(completed_status_name)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
