use tracing::{info, warn};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        repo_types::User,
    },
    error::AppError,
    session::{Session, SessionUser},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "invalid login or password";

fn require_fields<'a>(login: &'a str, password: &str) -> Result<&'a str, AppError> {
    let login = login.trim();
    if login.is_empty() {
        return Err(AppError::validation("login is required"));
    }
    if password.trim().is_empty() {
        return Err(AppError::validation("password is required"));
    }
    Ok(login)
}

/// Creates an account. Does not log in.
pub async fn register(state: &AppState, login: &str, password: &str) -> Result<User, AppError> {
    let login = require_fields(login, password)?;

    let min = state.config.min_password_len;
    if password.chars().count() < min {
        return Err(AppError::Validation(format!(
            "password must be at least {min} characters"
        )));
    }

    if state.users.find_by_login(login).await?.is_some() {
        warn!(login, "login already registered");
        return Err(AppError::Conflict("login already taken".into()));
    }

    let hash = hash_password(password)?;
    let user = state.users.create(login, &hash).await?;

    info!(user_id = user.user_id, login = %user.login, "user registered");
    Ok(user)
}

/// Checks credentials without touching any session.
pub async fn authenticate(
    state: &AppState,
    login: &str,
    password: &str,
) -> Result<SessionUser, AppError> {
    let login = require_fields(login, password)?;

    let Some(user) = state.users.find_by_login(login).await? else {
        warn!(login, "login unknown user");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.user_id, "login invalid password");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }

    Ok(SessionUser {
        user_id: user.user_id,
        login: user.login,
    })
}

/// Checks credentials and puts the user into `session`. On failure the
/// session is left as it was.
pub async fn login(
    state: &AppState,
    session: &mut Session,
    login: &str,
    password: &str,
) -> Result<SessionUser, AppError> {
    let current = authenticate(state, login, password).await?;
    session.login(current.clone());
    info!(user_id = current.user_id, "user logged in");
    Ok(current)
}

pub fn logout(session: &mut Session) {
    if let Some(user) = session.current() {
        info!(user_id = user.user_id, "user logged out");
    }
    session.logout();
}

pub fn me(session: &Session) -> Result<SessionUser, AppError> {
    session.require().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_login() {
        let (state, _store) = AppState::fake();
        let user = register(&state, "  anna ", "secret").await.unwrap();
        assert_eq!(user.login, "anna");
        assert_ne!(user.password_hash, "secret");

        let mut session = Session::default();
        let current = login(&state, &mut session, "anna", "secret").await.unwrap();
        assert_eq!(current.user_id, user.user_id);
        assert_eq!(session.current(), Some(&current));
        assert_eq!(me(&session).unwrap().login, "anna");
    }

    #[tokio::test]
    async fn register_does_not_log_in() {
        let (state, _store) = AppState::fake();
        register(&state, "anna", "secret").await.unwrap();
        assert!(state.session().await.current().is_none());
    }

    #[tokio::test]
    async fn duplicate_login_conflicts_and_keeps_account() {
        let (state, _store) = AppState::fake();
        register(&state, "anna", "secret").await.unwrap();

        let err = register(&state, "anna", "other-pass").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let mut session = Session::default();
        assert!(login(&state, &mut session, "anna", "secret").await.is_ok());
    }

    #[tokio::test]
    async fn register_validates_input() {
        let (state, _store) = AppState::fake();
        for (l, p) in [("", "secret"), ("   ", "secret"), ("anna", ""), ("anna", "abc")] {
            let err = register(&state, l, p).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{l:?}/{p:?}");
        }
        assert!(register(&state, "anna", "abcd").await.is_ok());
    }

    #[tokio::test]
    async fn bad_credentials_leave_session_alone() {
        let (state, _store) = AppState::fake();
        let anna = register(&state, "anna", "secret").await.unwrap();
        register(&state, "boris", "secret").await.unwrap();

        let mut session = Session::default();
        login(&state, &mut session, "anna", "secret").await.unwrap();

        let err = login(&state, &mut session, "boris", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(ref m) if m == INVALID_CREDENTIALS));
        let err = login(&state, &mut session, "nobody", "secret").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));

        assert_eq!(session.current().map(|u| u.user_id), Some(anna.user_id));
    }

    #[tokio::test]
    async fn authenticate_does_not_touch_the_process_session() {
        let (state, _store) = AppState::fake();
        let anna = register(&state, "anna", "secret").await.unwrap();

        let current = authenticate(&state, "anna", "secret").await.unwrap();
        assert_eq!(current.user_id, anna.user_id);
        assert!(state.session().await.current().is_none());

        assert!(matches!(
            authenticate(&state, "anna", "wrong").await,
            Err(AppError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let (state, _store) = AppState::fake();
        register(&state, "anna", "secret").await.unwrap();
        let mut session = Session::default();
        login(&state, &mut session, "anna", "secret").await.unwrap();

        logout(&mut session);
        assert!(matches!(me(&session), Err(AppError::Auth(_))));
    }
}
