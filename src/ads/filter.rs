use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};
use sqlx::{Postgres, QueryBuilder};

use crate::ads::repo_types::ListingRow;

/// Optional listing predicates, ANDed together. An absent field matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingFilter {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub city_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub type_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status_id: Option<i32>,
}

/// An unselected form field arrives as `key=`; treat it as absent.
fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

impl ListingFilter {
    /// Search text as typed; blank text counts as no text.
    fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    fn needle(&self) -> Option<String> {
        self.text().map(str::to_lowercase)
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none()
            && self.city_id.is_none()
            && self.category_id.is_none()
            && self.type_id.is_none()
            && self.status_id.is_none()
    }

    pub fn matches(&self, row: &ListingRow) -> bool {
        if let Some(needle) = self.needle() {
            let in_title = row.title.to_lowercase().contains(&needle);
            let in_description = row
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        self.city_id.map_or(true, |id| row.city_id == id)
            && self.category_id.map_or(true, |id| row.category_id == id)
            && self.type_id.map_or(true, |id| row.type_id == id)
            && self.status_id.map_or(true, |id| row.status_id == id)
    }

    /// Appends ` AND …` clauses for the present fields. The builder must
    /// already hold a `WHERE` with the `ads` table aliased as `a`.
    pub(crate) fn push_predicates(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        // Both sides go through Postgres `lower()` so they fold alike.
        if let Some(text) = self.text() {
            qb.push(" AND (strpos(lower(a.title), lower(")
                .push_bind(text.to_string())
                .push(")) > 0 OR strpos(lower(coalesce(a.description, '')), lower(")
                .push_bind(text.to_string())
                .push(")) > 0)");
        }
        if let Some(id) = self.city_id {
            qb.push(" AND a.city_id = ").push_bind(id);
        }
        if let Some(id) = self.category_id {
            qb.push(" AND a.category_id = ").push_bind(id);
        }
        if let Some(id) = self.type_id {
            qb.push(" AND a.type_id = ").push_bind(id);
        }
        if let Some(id) = self.status_id {
            qb.push(" AND a.status_id = ").push_bind(id);
        }
    }
}
