use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    ads::{
        dto::{AdChanges, AdForm, CompletedAds},
        filter::ListingFilter,
        repo_types::{Ad, ListingRow, MyAdRow},
        services,
    },
    auth::extractors::CurrentSession,
    error::AppError,
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/ads", get(search_ads))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/me/ads", get(list_my_ads).post(create_ad))
        .route(
            "/me/ads/:id",
            get(get_my_ad).put(update_ad).delete(delete_ad),
        )
        .route("/me/completed-ads", get(completed_ads))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn search_ads(
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<Vec<ListingRow>>, AppError> {
    Ok(Json(services::search(&state, &filter).await?))
}

#[instrument(skip(state, session))]
pub async fn list_my_ads(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<MyAdRow>>, AppError> {
    Ok(Json(services::list_mine(&state, &session).await?))
}

#[instrument(skip(state, session, form))]
pub async fn create_ad(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<AdForm>,
) -> Result<(StatusCode, Json<Ad>), AppError> {
    let ad = services::create(&state, &session, form).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

#[instrument(skip(state, session))]
pub async fn get_my_ad(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i32>,
) -> Result<Json<Ad>, AppError> {
    services::get_by_id(&state, &session, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("ad {id} not found")))
}

#[instrument(skip(state, session, changes))]
pub async fn update_ad(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i32>,
    Json(changes): Json<AdChanges>,
) -> Result<Json<Ad>, AppError> {
    Ok(Json(services::update(&state, &session, id, changes).await?))
}

#[instrument(skip(state, session))]
pub async fn delete_ad(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    services::delete(&state, &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, session))]
pub async fn completed_ads(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<CompletedAds>, AppError> {
    Ok(Json(services::completed_for(&state, &session).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, catalog::repo_types::CatalogKind, session::SessionUser};
    use axum::{
        body::Body,
        http::{Request, Uri},
        response::IntoResponse,
    };
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    #[tokio::test]
    async fn foreign_ad_is_a_404() {
        let (state, store) = AppState::fake();
        let city = store.seed(CatalogKind::City, &["Kazan"]).await[0];
        let category = store.seed(CatalogKind::Category, &["Home"]).await[0];
        let ad_type = store.seed(CatalogKind::AdType, &["Sell"]).await[0];
        let status = store.seed(CatalogKind::AdStatus, &["Active"]).await[0];

        state.session.write().await.login(SessionUser {
            user_id: 1,
            login: "owner".into(),
        });
        let form = AdForm {
            title: "Lamp".into(),
            description: None,
            price: Decimal::new(250, 0),
            image_path: None,
            city_id: city,
            category_id: category,
            type_id: ad_type,
            status_id: status,
            profit_amount: None,
        };
        let (code, Json(ad)) = create_ad(
            State(state.clone()),
            CurrentSession(state.session().await),
            Json(form),
        )
        .await
        .unwrap();
        assert_eq!(code, StatusCode::CREATED);

        state.session.write().await.login(SessionUser {
            user_id: 2,
            login: "intruder".into(),
        });
        let res = get_my_ad(
            State(state.clone()),
            CurrentSession(state.session().await),
            Path(ad.ad_id),
        )
        .await
        .into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn owner_routes_need_login() {
        let (state, _store) = AppState::fake();
        let res = list_my_ads(State(state.clone()), CurrentSession(state.session().await))
            .await
            .into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn blank_search_params_are_accepted() {
        let (state, _store) = AppState::fake();
        let res = build_app(state)
            .oneshot(
                Request::get("/api/v1/ads?text=&city_id=&category_id=&type_id=&status_id=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn blank_ids_parse_as_absent() {
        let uri = Uri::from_static("/ads?text=&city_id=&status_id=3");
        let Query(filter) = Query::<ListingFilter>::try_from_uri(&uri).unwrap();
        assert_eq!(filter.city_id, None);
        assert_eq!(filter.status_id, Some(3));
        assert!(filter.text.as_deref().map_or(true, str::is_empty));

        let bad = Uri::from_static("/ads?city_id=kazan");
        assert!(Query::<ListingFilter>::try_from_uri(&bad).is_err());
    }

    #[test]
    fn completed_summary_serializes_total() {
        let summary = CompletedAds::from_rows(Vec::new());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["ads"].as_array().unwrap().is_empty());
    }
}
