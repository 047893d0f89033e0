//! Signed-in user state.

use store_commerce::user::User;
use tokio::sync::RwLock;

/// Holds the current user, if any.
#[derive(Debug, Default)]
pub struct AuthStore {
    user: RwLock<Option<User>>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    pub async fn is_admin(&self) -> bool {
        self.user.read().await.as_ref().is_some_and(User::is_admin)
    }

    pub(crate) async fn set_user(&self, user: User) {
        *self.user.write().await = Some(user);
    }

    pub(crate) async fn clear(&self) {
        *self.user.write().await = None;
    }
}
