//! Wishlist state mirrored from the server.

use crate::SessionError;
use store_api::StoreApi;
use store_commerce::wishlist::{Wishlist, WishlistItem};
use store_commerce::ProductId;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// The signed-in user's wishlist.
#[derive(Debug)]
pub struct WishlistStore {
    api: StoreApi,
    wishlist: RwLock<Wishlist>,
}

impl WishlistStore {
    pub fn new(api: StoreApi) -> Self {
        Self {
            api,
            wishlist: RwLock::new(Wishlist::new()),
        }
    }

    pub async fn snapshot(&self) -> Wishlist {
        self.wishlist.read().await.clone()
    }

    pub async fn contains(&self, product_id: &ProductId) -> bool {
        self.wishlist.read().await.contains(product_id)
    }

    pub async fn refresh(&self) -> Result<Wishlist, SessionError> {
        let wishlist = self.api.wishlist().get().await?;
        debug!(items = wishlist.len(), "wishlist synced");
        Ok(self.replace(wishlist).await)
    }

    /// Add or remove the product. Returns `true` if it is now saved.
    ///
    /// The local flip happens first and is undone if the server refuses.
    pub async fn toggle(&self, item: WishlistItem) -> Result<bool, SessionError> {
        let product_id = item.product_id.clone();
        let (previous, now_saved) = {
            let mut wishlist = self.wishlist.write().await;
            let previous = wishlist.clone();
            let now_saved = wishlist.toggle(item);
            (previous, now_saved)
        };

        let result = if now_saved {
            self.api.wishlist().add(&product_id).await
        } else {
            self.api.wishlist().remove(&product_id).await
        };

        match result {
            Ok(wishlist) => {
                self.replace(wishlist).await;
                debug!(product_id = %product_id, saved = now_saved, "wishlist toggled");
                Ok(now_saved)
            }
            Err(e) => {
                warn!(product_id = %product_id, error = %e, "wishlist toggle rejected");
                *self.wishlist.write().await = previous;
                Err(e.into())
            }
        }
    }

    /// Drop local state without touching the server.
    pub(crate) async fn reset(&self) {
        self.wishlist.write().await.clear();
    }

    async fn replace(&self, wishlist: Wishlist) -> Wishlist {
        let mut current = self.wishlist.write().await;
        *current = wishlist;
        current.clone()
    }
}
