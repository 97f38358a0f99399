use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string
}
