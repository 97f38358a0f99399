use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{Credentials, PublicUser},
        extractors::CurrentSession,
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = services::register(&state, &payload.login, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<PublicUser>, AppError> {
    // Hash verification runs before the slot is locked.
    let user = services::authenticate(&state, &payload.login, &payload.password).await?;
    state.session.write().await.login(user.clone());
    info!(user_id = user.user_id, "user logged in");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    services::logout(&mut *state.session.write().await);
    StatusCode::NO_CONTENT
}

#[instrument(skip(session))]
pub async fn get_me(CurrentSession(session): CurrentSession) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(services::me(&session)?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    fn creds(login: &str, password: &str) -> Json<Credentials> {
        Json(Credentials {
            login: login.into(),
            password: password.into(),
        })
    }

    #[tokio::test]
    async fn login_fills_the_process_session() {
        let (state, _store) = AppState::fake();
        let (code, _) = register(State(state.clone()), creds("anna", "secret"))
            .await
            .unwrap();
        assert_eq!(code, StatusCode::CREATED);

        let Json(user) = login(State(state.clone()), creds("anna", "secret"))
            .await
            .unwrap();
        assert_eq!(user.login, "anna");
        assert_eq!(
            state.session().await.current().map(|u| u.user_id),
            Some(user.user_id)
        );

        assert_eq!(logout(State(state.clone())).await, StatusCode::NO_CONTENT);
        assert!(state.session().await.current().is_none());
    }

    #[tokio::test]
    async fn duplicate_and_bad_credentials_are_distinct() {
        let (state, _store) = AppState::fake();
        register(State(state.clone()), creds("anna", "secret")).await.unwrap();

        let dup = register(State(state.clone()), creds("anna", "secret"))
            .await
            .into_response();
        assert_eq!(dup.status(), StatusCode::CONFLICT);

        let bad = login(State(state.clone()), creds("anna", "nope"))
            .await
            .into_response();
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn failed_login_keeps_the_previous_user() {
        let (state, _store) = AppState::fake();
        register(State(state.clone()), creds("anna", "secret")).await.unwrap();
        register(State(state.clone()), creds("boris", "secret")).await.unwrap();

        let Json(anna) = login(State(state.clone()), creds("anna", "secret"))
            .await
            .unwrap();
        let res = login(State(state.clone()), creds("boris", "wrong"))
            .await
            .into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            state.session().await.current().map(|u| u.user_id),
            Some(anna.user_id)
        );
    }

    #[test]
    fn public_user_hides_password() {
        let user = crate::auth::repo_types::User {
            user_id: 1,
            login: "anna".into(),
            password_hash: "$argon2id$...".into(),
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("anna"));
        assert!(!json.contains("argon2"));
    }
}
