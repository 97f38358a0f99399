use serde::Serialize;

use crate::error::AppError;

/// Identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub user_id: i32,
    pub login: String,
}

/// The process-wide login slot. Only login and logout write to it; every
/// owner-scoped operation receives a `&Session` explicitly.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    pub fn login(&mut self, user: SessionUser) {
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn require(&self) -> Result<&SessionUser, AppError> {
        self.current()
            .ok_or_else(|| AppError::Auth("login required".into()))
    }
}
