use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ads::repo_types::CompletedRow;

/// Request body for posting an ad.
#[derive(Debug, Clone, Deserialize)]
pub struct AdForm {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_path: Option<String>,
    pub city_id: i32,
    pub category_id: i32,
    pub type_id: i32,
    pub status_id: i32,
    #[serde(default)]
    pub profit_amount: Option<Decimal>,
}

/// Partial update. Absent fields keep their value; an empty description or
/// image path clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_path: Option<String>,
    pub city_id: Option<i32>,
    pub category_id: Option<i32>,
    pub type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub profit_amount: Option<Decimal>,
}

/// A user's finished deals with their summed profit.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedAds {
    pub ads: Vec<CompletedRow>,
    pub total_profit: Decimal,
    pub count: usize,
}

impl CompletedAds {
    pub fn from_rows(ads: Vec<CompletedRow>) -> Self {
        let total_profit = ads.iter().map(|a| a.profit_amount).sum();
        Self {
            count: ads.len(),
            total_profit,
            ads,
        }
    }

    /// No completed deals yet. Not an error.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
