use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Ad record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Ad {
    pub ad_id: i32,
    pub user_id: i32, // owner
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub post_date: OffsetDateTime,
    pub image_path: Option<String>,
    pub city_id: i32,
    pub category_id: i32,
    pub type_id: i32,
    pub status_id: i32,
    pub profit_amount: Option<Decimal>, // set only while completed
}

/// Validated insert payload.
#[derive(Debug, Clone)]
pub struct NewAd {
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub post_date: OffsetDateTime,
    pub image_path: Option<String>,
    pub city_id: i32,
    pub category_id: i32,
    pub type_id: i32,
    pub status_id: i32,
    pub profit_amount: Option<Decimal>,
}

/// Public listing row: ad fields joined with the reference names.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ListingRow {
    pub ad_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub post_date: OffsetDateTime,
    pub image_path: Option<String>,
    pub city_id: i32,
    pub category_id: i32,
    pub type_id: i32,
    pub status_id: i32,
    pub city_name: String,
    pub category_name: String,
    pub type_name: String,
    pub status_name: String,
}

/// Row of the owner's own ad list.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MyAdRow {
    pub ad_id: i32,
    pub title: String,
    pub price: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub post_date: OffsetDateTime,
    pub status_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompletedRow {
    pub ad_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub post_date: OffsetDateTime,
    pub profit_amount: Decimal,
    pub city_name: String,
    pub category_name: String,
    pub type_name: String,
}
