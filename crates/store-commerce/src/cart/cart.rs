//! Cart and cart item types.
//!
//! The server owns the cart; this type mirrors the last response and applies
//! local quantity edits optimistically until the next response replaces it.

use crate::cart::{CartPricing, LineItemPricing};
use crate::error::CommerceError;
use crate::ids::{CartItemId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// The size/color a cart line refers to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VariantChoice {
    pub size: String,
    pub color: String,
}

impl fmt::Display for VariantChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.size, self.color)
    }
}

/// An item about to be added to the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub variant: Option<VariantChoice>,
    /// Price shown when the item was picked.
    pub unit_price: Money,
}

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<CartItem>,
    /// Cart currency.
    pub currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a cart from items returned by the server.
    pub fn with_items(items: Vec<CartItem>, currency: Currency) -> Self {
        Self { items, currency }
    }

    /// Replace all items with a fresh server snapshot.
    pub fn replace_items(&mut self, items: Vec<CartItem>) {
        self.items = items;
    }

    /// Update item quantity.
    ///
    /// If quantity is <= 0, removes the item. Returns whether an item changed.
    pub fn set_quantity(
        &mut self,
        line_item_id: &CartItemId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(line_item_id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let Some(item) = self.items.iter_mut().find(|i| &i.id == line_item_id) else {
            return Ok(false);
        };

        if let Some(stock) = item.stock {
            if quantity > stock {
                return Err(CommerceError::InsufficientStock {
                    requested: quantity,
                    available: stock,
                });
            }
        }

        item.quantity = quantity;
        Ok(true)
    }

    /// Remove an item from the cart.
    pub fn remove_item(&mut self, line_item_id: &CartItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != line_item_id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a product/variant pair.
    pub fn find_line(
        &self,
        product_id: &ProductId,
        variant: Option<&VariantChoice>,
    ) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|i| &i.product_id == product_id && i.variant.as_ref() == variant)
    }

    /// Sum of `unit_price * quantity` over all items.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        let mut subtotal = Money::zero(self.currency);
        for item in &self.items {
            let line = item.line_total()?;
            subtotal = subtotal.try_add(&line).ok_or_else(|| {
                if line.currency != self.currency {
                    CommerceError::CurrencyMismatch {
                        expected: self.currency.code().to_string(),
                        got: line.currency.code().to_string(),
                    }
                } else {
                    CommerceError::Overflow
                }
            })?;
        }
        Ok(subtotal)
    }

    /// Calculate cart pricing.
    pub fn calculate_pricing(&self) -> Result<CartPricing, CommerceError> {
        let line_items = self
            .items
            .iter()
            .map(|item| {
                Ok(LineItemPricing {
                    line_item_id: item.id.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    total: item.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        Ok(CartPricing {
            subtotal: self.subtotal()?,
            item_count: self.item_count(),
            line_items,
        })
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Unique line identifier.
    pub id: CartItemId,
    /// Product ID.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Product image.
    pub image: Option<String>,
    /// Selected size/color, if the product has variants.
    pub variant: Option<VariantChoice>,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Stock reported with the line, if known.
    pub stock: Option<i64>,
}

impl CartItem {
    /// `unit_price * quantity`.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Name with the variant label, e.g. "Tee (M / red)".
    pub fn title(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{} ({})", self.name, variant),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, cents: i64, quantity: i64) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(format!("prod-{id}")),
            name: format!("Product {id}"),
            image: None,
            variant: None,
            unit_price: Money::new(cents, Currency::USD),
            quantity,
            stock: None,
        }
    }

    fn cart() -> Cart {
        Cart::with_items(
            vec![item("a", 1000, 2), item("b", 2000, 1)],
            Currency::USD,
        )
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::new(Currency::USD);
        assert!(cart.is_empty());
        assert!(cart.subtotal().unwrap().is_zero());
    }

    #[test]
    fn test_subtotal_is_sum_of_lines() {
        let cart = cart();
        assert_eq!(cart.subtotal().unwrap().amount_cents, 4000);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.unique_item_count(), 2);
    }

    #[test]
    fn test_quantity_change_touches_only_that_line() {
        let mut cart = cart();
        let before = cart.calculate_pricing().unwrap();

        assert!(cart.set_quantity(&CartItemId::new("a"), 5).unwrap());
        let after = cart.calculate_pricing().unwrap();

        assert_eq!(after.line_items[0].total.amount_cents, 5000);
        assert_eq!(after.line_items[1], before.line_items[1]);
        assert_eq!(after.subtotal.amount_cents, 7000);
    }

    #[test]
    fn test_zero_quantity_removes() {
        let mut cart = cart();
        assert!(cart.set_quantity(&CartItemId::new("a"), 0).unwrap());
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_quantity_bounded_by_stock() {
        let mut cart = cart();
        cart.items[0].stock = Some(3);
        let err = cart.set_quantity(&CartItemId::new("a"), 4).unwrap_err();
        assert_eq!(
            err,
            CommerceError::InsufficientStock {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = cart();
        let result = cart.set_quantity(&CartItemId::new("a"), MAX_QUANTITY_PER_ITEM + 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_line_is_noop() {
        let mut cart = cart();
        assert!(!cart.set_quantity(&CartItemId::new("zzz"), 2).unwrap());
        assert!(!cart.remove_item(&CartItemId::new("zzz")));
    }

    #[test]
    fn test_find_line_by_variant() {
        let mut cart = cart();
        let choice = VariantChoice {
            size: "M".to_string(),
            color: "red".to_string(),
        };
        cart.items[0].variant = Some(choice.clone());

        let product = ProductId::new("prod-a");
        assert!(cart.find_line(&product, Some(&choice)).is_some());
        assert!(cart.find_line(&product, None).is_none());
        assert_eq!(cart.items[0].title(), "Product a (M / red)");
    }

    #[test]
    fn test_currency_mismatch_reported() {
        let mut cart = cart();
        cart.items[1].unit_price = Money::new(100, Currency::EUR);
        assert!(matches!(
            cart.subtotal(),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }
}
