//! Wishlist of saved-for-later products.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product saved to the wishlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Option<Money>,
    pub image: Option<String>,
}

impl WishlistItem {
    /// A bare reference, used before the server fills in the details.
    pub fn reference(product_id: ProductId) -> Self {
        Self {
            product_id,
            name: String::new(),
            price: None,
            image: None,
        }
    }
}

/// The signed-in user's wishlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Wishlist {
    pub items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<WishlistItem>) -> Self {
        Self { items }
    }

    /// Membership check by linear scan.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|i| &i.product_id == product_id)
    }

    /// Add an item unless it is already present. Returns whether it was added.
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.contains(&item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove by product. Returns whether something was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() < len_before
    }

    /// Flip membership. Returns `true` if the product is now in the wishlist.
    pub fn toggle(&mut self, item: WishlistItem) -> bool {
        if self.remove(&item.product_id) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    pub fn replace_items(&mut self, items: Vec<WishlistItem>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut wishlist = Wishlist::with_items(vec![WishlistItem::reference(ProductId::new("a"))]);
        let original = wishlist.clone();

        assert!(wishlist.toggle(WishlistItem::reference(ProductId::new("b"))));
        assert!(wishlist.contains(&ProductId::new("b")));
        assert!(!wishlist.toggle(WishlistItem::reference(ProductId::new("b"))));
        assert_eq!(wishlist, original);

        assert!(!wishlist.toggle(WishlistItem::reference(ProductId::new("a"))));
        assert!(wishlist.toggle(WishlistItem::reference(ProductId::new("a"))));
        assert!(wishlist.contains(&ProductId::new("a")));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(WishlistItem::reference(ProductId::new("a"))));
        assert!(!wishlist.add(WishlistItem::reference(ProductId::new("a"))));
        assert_eq!(wishlist.len(), 1);
    }
}
