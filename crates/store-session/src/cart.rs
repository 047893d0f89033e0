//! Cart state mirrored from the server.

use crate::SessionError;
use store_api::StoreApi;
use store_commerce::cart::{Cart, NewCartItem};
use store_commerce::CartItemId;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// The signed-in user's cart.
///
/// Every successful call replaces the local cart with the server's answer.
/// Quantity edits and removals are applied locally first and rolled back if
/// the server refuses them.
#[derive(Debug)]
pub struct CartStore {
    api: StoreApi,
    cart: RwLock<Cart>,
}

impl CartStore {
    pub fn new(api: StoreApi) -> Self {
        let cart = Cart::new(api.currency());
        Self {
            api,
            cart: RwLock::new(cart),
        }
    }

    pub async fn snapshot(&self) -> Cart {
        self.cart.read().await.clone()
    }

    pub async fn item_count(&self) -> i64 {
        self.cart.read().await.item_count()
    }

    pub async fn refresh(&self) -> Result<Cart, SessionError> {
        let cart = self.api.cart().get().await?;
        debug!(lines = cart.unique_item_count(), "cart synced");
        Ok(self.replace(cart).await)
    }

    pub async fn add(&self, item: &NewCartItem) -> Result<Cart, SessionError> {
        let cart = self.api.cart().add(item).await?;
        debug!(product_id = %item.product_id, quantity = item.quantity, "added to cart");
        Ok(self.replace(cart).await)
    }

    /// Change a line's quantity. Zero or less removes the line.
    pub async fn update_quantity(
        &self,
        item_id: &CartItemId,
        quantity: i64,
    ) -> Result<Cart, SessionError> {
        if quantity <= 0 {
            return self.remove(item_id).await;
        }

        let previous = {
            let mut cart = self.cart.write().await;
            let previous = cart.clone();
            cart.set_quantity(item_id, quantity)?;
            previous
        };

        match self.api.cart().update(item_id, quantity).await {
            Ok(cart) => Ok(self.replace(cart).await),
            Err(e) => {
                warn!(item_id = %item_id, error = %e, "quantity update rejected");
                *self.cart.write().await = previous;
                Err(e.into())
            }
        }
    }

    pub async fn remove(&self, item_id: &CartItemId) -> Result<Cart, SessionError> {
        let previous = {
            let mut cart = self.cart.write().await;
            let previous = cart.clone();
            cart.remove_item(item_id);
            previous
        };

        match self.api.cart().remove(item_id).await {
            Ok(cart) => Ok(self.replace(cart).await),
            Err(e) => {
                warn!(item_id = %item_id, error = %e, "remove rejected");
                *self.cart.write().await = previous;
                Err(e.into())
            }
        }
    }

    /// Empty the cart on the server and locally.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let cart = self.api.cart().clear().await?;
        self.replace(cart).await;
        Ok(())
    }

    /// Drop local state without touching the server.
    pub(crate) async fn reset(&self) {
        self.cart.write().await.clear();
    }

    async fn replace(&self, cart: Cart) -> Cart {
        let mut current = self.cart.write().await;
        *current = cart;
        current.clone()
    }
}
