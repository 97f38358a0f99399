use serde::{Deserialize, Serialize};

use crate::{auth::repo_types::User, session::SessionUser};

/// Request body for registration and login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub user_id: i32,
    pub login: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            login: u.login,
        }
    }
}

impl From<SessionUser> for PublicUser {
    fn from(u: SessionUser) -> Self {
        Self {
            user_id: u.user_id,
            login: u.login,
        }
    }
}
