//! The signed-in session: token, user, cart and wishlist.

use crate::{Access, AuthStore, CartStore, SessionError, WishlistStore};
use store_api::{AuthSession, ProfileUpdate, StoreApi};
use store_commerce::user::User;
use tracing::{debug, info, warn};

/// Everything that lives and dies with a login.
#[derive(Debug)]
pub struct Session {
    api: StoreApi,
    auth: AuthStore,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl Session {
    pub fn new(api: StoreApi) -> Self {
        Self {
            auth: AuthStore::new(),
            cart: CartStore::new(api.clone()),
            wishlist: WishlistStore::new(api.clone()),
            api,
        }
    }

    pub fn api(&self) -> &StoreApi {
        &self.api
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let session = self.api.auth().login(email, password).await?;
        self.establish(session).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, SessionError> {
        let session = self.api.auth().register(name, email, password).await?;
        self.establish(session).await
    }

    /// Forget the token and reset every store.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let cleared = self.api.client().clear_token();
        self.reset().await;
        info!("signed out");
        cleared.map_err(SessionError::from)
    }

    /// Rebuild the session from a stored token.
    ///
    /// Returns `None` without a token. A token the server rejects is dropped.
    pub async fn restore(&self) -> Result<Option<User>, SessionError> {
        if !self.api.client().has_token() {
            return Ok(None);
        }

        match self.api.auth().profile().await {
            Ok(user) => {
                self.auth.set_user(user.clone()).await;
                self.sync().await;
                debug!(user_id = %user.id, "session restored");
                Ok(Some(user))
            }
            Err(e) => {
                warn!(error = %e, "stored token rejected");
                if let Err(clear_err) = self.api.client().clear_token() {
                    warn!(error = %clear_err, "could not clear stored token");
                }
                self.reset().await;
                if e.is_unauthorized() {
                    Ok(None)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Update the profile, keeping any refreshed token.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, SessionError> {
        self.require(Access::Authenticated).await?;
        let (user, token) = self.api.auth().update_profile(update).await?;
        if let Some(token) = token {
            self.api.client().set_token(token)?;
        }
        self.auth.set_user(user.clone()).await;
        Ok(user)
    }

    /// Check the current user against `access` and return them.
    ///
    /// Fails with [`SessionError::NotAuthenticated`] when nobody is signed in,
    /// even for [`Access::Public`].
    pub async fn require(&self, access: Access) -> Result<User, SessionError> {
        let user = self.auth.user().await;
        access.check(user.as_ref())?;
        user.ok_or(SessionError::NotAuthenticated)
    }

    /// Pull the cart and wishlist. Failures are logged, not returned.
    pub async fn sync(&self) {
        let (cart, wishlist) = tokio::join!(self.cart.refresh(), self.wishlist.refresh());
        if let Err(e) = cart {
            warn!(error = %e, "cart sync failed");
        }
        if let Err(e) = wishlist {
            warn!(error = %e, "wishlist sync failed");
        }
    }

    async fn establish(&self, session: AuthSession) -> Result<User, SessionError> {
        let AuthSession { user, token } = session;
        self.api.client().set_token(token)?;
        self.auth.set_user(user.clone()).await;
        self.sync().await;
        info!(user_id = %user.id, role = user.role.as_str(), "signed in");
        Ok(user)
    }

    async fn reset(&self) {
        self.auth.clear().await;
        self.cart.reset().await;
        self.wishlist.reset().await;
    }
}
