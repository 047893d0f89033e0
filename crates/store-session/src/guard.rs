//! Access guards for authenticated and admin-only views.

use crate::SessionError;
use store_commerce::user::User;

/// Who may open a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

impl Access {
    /// Check `user` against this level.
    pub fn check(&self, user: Option<&User>) -> Result<(), SessionError> {
        match (self, user) {
            (Access::Public, _) => Ok(()),
            (_, None) => Err(SessionError::NotAuthenticated),
            (Access::Authenticated, Some(_)) => Ok(()),
            (Access::Admin, Some(user)) if user.is_admin() => Ok(()),
            (Access::Admin, Some(_)) => Err(SessionError::Forbidden),
        }
    }
}
