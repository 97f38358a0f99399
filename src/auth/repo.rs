use async_trait::async_trait;

use crate::{auth::repo_types::User, db::PgStore, error::AppError};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError>;
    /// Fails with `Conflict` when the login is taken.
    async fn create(&self, login: &str, password_hash: &str) -> Result<User, AppError>;
}

#[async_trait]
impl UserRepo for PgStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, login, password_hash
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, login: &str, password_hash: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password_hash)
            VALUES ($1, $2)
            RETURNING user_id, login, password_hash
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let taken = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if taken {
                AppError::Conflict("login already taken".into())
            } else {
                AppError::Store(e)
            }
        })
    }
}
