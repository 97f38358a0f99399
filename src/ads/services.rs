use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::{
    ads::{
        dto::{AdChanges, AdForm, CompletedAds},
        filter::ListingFilter,
        repo_types::{Ad, ListingRow, MyAdRow, NewAd},
    },
    catalog::{
        repo_types::CatalogKind,
        services::{completed_status_ids, ensure_exists},
    },
    error::AppError,
    session::Session,
    state::AppState,
};

fn normalize_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title is required"));
    }
    Ok(title.to_string())
}

/// Trims; empty means absent.
fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Money columns are `NUMERIC(12, 2)`: two decimal places, ten integer digits.
fn ensure_money_fits(field: &str, value: Decimal) -> Result<(), AppError> {
    if value.normalize().scale() > 2 {
        return Err(AppError::Validation(format!(
            "{field} must have at most two decimal places"
        )));
    }
    if value.abs() >= Decimal::new(10_000_000_000, 0) {
        return Err(AppError::Validation(format!("{field} is too large")));
    }
    Ok(())
}

fn ensure_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::validation("price must not be negative"));
    }
    ensure_money_fits("price", price)
}

/// Profit is required and non-negative while completed, dropped otherwise.
fn settle_profit(completed: bool, profit: Option<Decimal>) -> Result<Option<Decimal>, AppError> {
    if !completed {
        return Ok(None);
    }
    match profit {
        Some(p) if p >= Decimal::ZERO => {
            ensure_money_fits("profit amount", p)?;
            Ok(Some(p))
        }
        _ => Err(AppError::validation(
            "completed ads need a non-negative profit amount",
        )),
    }
}

pub async fn create(state: &AppState, session: &Session, form: AdForm) -> Result<Ad, AppError> {
    let owner = session.require()?;

    let title = normalize_title(&form.title)?;
    ensure_price(form.price)?;
    ensure_exists(state, CatalogKind::City, form.city_id).await?;
    ensure_exists(state, CatalogKind::Category, form.category_id).await?;
    ensure_exists(state, CatalogKind::AdType, form.type_id).await?;
    let status = ensure_exists(state, CatalogKind::AdStatus, form.status_id).await?;

    let completed = status.name == state.config.completed_status_name;
    let profit_amount = settle_profit(completed, form.profit_amount)?;

    let ad = state
        .ads
        .insert(NewAd {
            user_id: owner.user_id,
            title,
            description: normalize_optional(form.description.as_deref()),
            price: form.price,
            post_date: OffsetDateTime::now_utc(),
            image_path: normalize_optional(form.image_path.as_deref()),
            city_id: form.city_id,
            category_id: form.category_id,
            type_id: form.type_id,
            status_id: form.status_id,
            profit_amount,
        })
        .await?;

    info!(ad_id = ad.ad_id, user_id = owner.user_id, "ad created");
    Ok(ad)
}

pub async fn update(
    state: &AppState,
    session: &Session,
    ad_id: i32,
    changes: AdChanges,
) -> Result<Ad, AppError> {
    let owner = session.require()?;

    let title = changes.title.as_deref().map(normalize_title).transpose()?;
    if let Some(price) = changes.price {
        ensure_price(price)?;
    }
    for (kind, id) in [
        (CatalogKind::City, changes.city_id),
        (CatalogKind::Category, changes.category_id),
        (CatalogKind::AdType, changes.type_id),
        (CatalogKind::AdStatus, changes.status_id),
    ] {
        if let Some(id) = id {
            ensure_exists(state, kind, id).await?;
        }
    }
    let completed_ids = completed_status_ids(state).await?;

    let apply = |mut ad: Ad| -> Result<Ad, AppError> {
        if let Some(title) = &title {
            ad.title = title.clone();
        }
        if let Some(description) = &changes.description {
            ad.description = normalize_optional(Some(description.as_str()));
        }
        if let Some(price) = changes.price {
            ad.price = price;
        }
        if let Some(image_path) = &changes.image_path {
            ad.image_path = normalize_optional(Some(image_path.as_str()));
        }
        ad.city_id = changes.city_id.unwrap_or(ad.city_id);
        ad.category_id = changes.category_id.unwrap_or(ad.category_id);
        ad.type_id = changes.type_id.unwrap_or(ad.type_id);
        ad.status_id = changes.status_id.unwrap_or(ad.status_id);

        let completed = completed_ids.contains(&ad.status_id);
        ad.profit_amount = settle_profit(completed, changes.profit_amount.or(ad.profit_amount))?;
        Ok(ad)
    };

    let ad = state
        .ads
        .update_owned(ad_id, owner.user_id, &apply)
        .await
        .map_err(|e| {
            if matches!(e, AppError::NotFound(_)) {
                warn!(ad_id, user_id = owner.user_id, "update of missing or foreign ad");
            }
            e
        })?;

    info!(ad_id, user_id = owner.user_id, "ad updated");
    Ok(ad)
}

pub async fn delete(state: &AppState, session: &Session, ad_id: i32) -> Result<(), AppError> {
    let owner = session.require()?;
    if !state.ads.delete_owned(ad_id, owner.user_id).await? {
        warn!(ad_id, user_id = owner.user_id, "delete of missing or foreign ad");
        return Err(AppError::NotFound(format!("ad {ad_id} not found")));
    }
    info!(ad_id, user_id = owner.user_id, "ad deleted");
    Ok(())
}

/// `None` both for a missing ad and for someone else's.
pub async fn get_by_id(
    state: &AppState,
    session: &Session,
    ad_id: i32,
) -> Result<Option<Ad>, AppError> {
    let owner = session.require()?;
    state.ads.find_owned(ad_id, owner.user_id).await
}

pub async fn list_mine(state: &AppState, session: &Session) -> Result<Vec<MyAdRow>, AppError> {
    let owner = session.require()?;
    state.ads.list_by_owner(owner.user_id).await
}

pub async fn search(state: &AppState, filter: &ListingFilter) -> Result<Vec<ListingRow>, AppError> {
    let rows = state.ads.search(filter).await?;
    debug!(?filter, unfiltered = filter.is_empty(), found = rows.len(), "listing search");
    Ok(rows)
}

pub async fn completed_for_user(state: &AppState, user_id: i32) -> Result<CompletedAds, AppError> {
    let rows = state
        .ads
        .completed_for(user_id, &state.config.completed_status_name)
        .await?;
    Ok(CompletedAds::from_rows(rows))
}

pub async fn completed_for(state: &AppState, session: &Session) -> Result<CompletedAds, AppError> {
    let owner = session.require()?;
    completed_for_user(state, owner.user_id).await
}
