//! Variant selection state machine for the product detail view.
//!
//! Size is chosen first, then color. Choosing a size narrows the colors;
//! choosing a color resolves the exact variant and bounds the quantity by
//! its stock. Products without variants start resolved against
//! `count_in_stock`.

use crate::cart::{NewCartItem, VariantChoice};
use crate::catalog::{ColorOption, Product, Variant};
use crate::CommerceError;

/// Where the selector currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionState {
    /// No size picked yet.
    NoSize,
    /// Size picked, waiting for a color.
    SizeSelected,
    /// Size and color resolve to a variant with stock.
    Resolved,
    /// Size and color resolve to a variant with no stock.
    OutOfStock,
    /// Size and color do not match any variant.
    Unresolved,
}

impl SelectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionState::NoSize => "no_size",
            SelectionState::SizeSelected => "size_selected",
            SelectionState::Resolved => "resolved",
            SelectionState::OutOfStock => "out_of_stock",
            SelectionState::Unresolved => "unresolved",
        }
    }
}

/// Drives size/color/quantity selection for one product.
#[derive(Debug, Clone)]
pub struct VariantSelector<'p> {
    product: &'p Product,
    size: Option<String>,
    color: Option<String>,
    variant: Option<&'p Variant>,
    quantity: i64,
}

impl<'p> VariantSelector<'p> {
    /// Start a selection for a product.
    pub fn new(product: &'p Product) -> Self {
        Self {
            product,
            size: None,
            color: None,
            variant: None,
            quantity: 1,
        }
    }

    /// The product being configured.
    pub fn product(&self) -> &'p Product {
        self.product
    }

    /// Current state.
    pub fn state(&self) -> SelectionState {
        if !self.product.has_variants() {
            return if self.product.count_in_stock > 0 {
                SelectionState::Resolved
            } else {
                SelectionState::OutOfStock
            };
        }

        match (&self.size, &self.color, self.variant) {
            (None, _, _) => SelectionState::NoSize,
            (Some(_), None, _) => SelectionState::SizeSelected,
            (Some(_), Some(_), None) => SelectionState::Unresolved,
            (Some(_), Some(_), Some(v)) if v.is_in_stock() => SelectionState::Resolved,
            (Some(_), Some(_), Some(_)) => SelectionState::OutOfStock,
        }
    }

    /// Sizes to offer.
    pub fn sizes(&self) -> Vec<&'p str> {
        self.product.sizes()
    }

    /// Colors to offer for the selected size; empty until a size is chosen.
    pub fn color_options(&self) -> Vec<ColorOption> {
        match &self.size {
            Some(size) => self.product.color_options(size),
            None => Vec::new(),
        }
    }

    /// Whether the color control is enabled.
    pub fn color_enabled(&self) -> bool {
        self.size.is_some()
    }

    /// Selected size.
    pub fn selected_size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Selected color.
    pub fn selected_color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Resolved variant, if size and color match one.
    pub fn resolved_variant(&self) -> Option<&'p Variant> {
        self.variant
    }

    /// Choose a size.
    ///
    /// Keeps the current color if the new size offers it, otherwise clears it.
    pub fn select_size(&mut self, size: &str) -> Result<SelectionState, CommerceError> {
        if !self.product.has_variants() {
            return Err(CommerceError::InvalidSelection(
                "product has no size options".to_string(),
            ));
        }
        if !self.product.sizes().contains(&size) {
            return Err(CommerceError::InvalidSelection(format!(
                "size {size} is not offered"
            )));
        }

        self.size = Some(size.to_string());

        let keep_color = self
            .color
            .as_deref()
            .map(|color| {
                self.product
                    .color_options(size)
                    .iter()
                    .any(|o| o.color == color)
            })
            .unwrap_or(false);

        if keep_color {
            self.resolve();
        } else {
            self.color = None;
            self.variant = None;
            self.quantity = 1;
        }

        Ok(self.state())
    }

    /// Choose a color for the selected size.
    pub fn select_color(&mut self, color: &str) -> Result<SelectionState, CommerceError> {
        if self.size.is_none() {
            return Err(CommerceError::InvalidSelection(
                "select a size before choosing a color".to_string(),
            ));
        }
        if color.trim().is_empty() {
            return Err(CommerceError::InvalidSelection("empty color".to_string()));
        }

        self.color = Some(color.to_string());
        self.resolve();
        Ok(self.state())
    }

    fn resolve(&mut self) {
        self.variant = match (&self.size, &self.color) {
            (Some(size), Some(color)) => self.product.find_variant(size, color),
            _ => None,
        };
        self.quantity = clamp_quantity(self.quantity, self.available_stock());
    }

    /// Stock available for the current selection.
    pub fn available_stock(&self) -> i64 {
        if !self.product.has_variants() {
            return self.product.count_in_stock.max(0);
        }
        self.variant.map(|v| v.stock.max(0)).unwrap_or(0)
    }

    /// Current quantity.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Set the quantity, clamped to `[1, stock]`. Returns the stored value.
    pub fn set_quantity(&mut self, quantity: i64) -> i64 {
        self.quantity = clamp_quantity(quantity, self.available_stock());
        self.quantity
    }

    pub fn increment(&mut self) -> i64 {
        self.set_quantity(self.quantity.saturating_add(1))
    }

    pub fn decrement(&mut self) -> i64 {
        self.set_quantity(self.quantity.saturating_sub(1))
    }

    /// Whether "Add to Cart" is enabled.
    pub fn can_add_to_cart(&self) -> bool {
        self.state() == SelectionState::Resolved && self.available_stock() > 0
    }

    /// Inline message explaining why the action is disabled.
    pub fn message(&self) -> Option<&'static str> {
        match self.state() {
            SelectionState::NoSize => Some("Please select a size"),
            SelectionState::SizeSelected => Some("Please select a color"),
            SelectionState::Unresolved => Some("This combination is not available"),
            SelectionState::OutOfStock if self.product.has_variants() => {
                Some("This combination is out of stock")
            }
            SelectionState::OutOfStock => Some("Out of stock"),
            SelectionState::Resolved => None,
        }
    }

    /// Build the cart request for the current selection.
    pub fn add_to_cart(&self) -> Result<NewCartItem, CommerceError> {
        if !self.can_add_to_cart() {
            let reason = self.message().unwrap_or("selection incomplete");
            return Err(CommerceError::NotPurchasable(reason.to_string()));
        }

        let variant = self.variant.map(|v| VariantChoice {
            size: v.size.clone(),
            color: v.color.clone(),
        });

        Ok(NewCartItem {
            product_id: self.product.id.clone(),
            quantity: self.quantity,
            variant,
            unit_price: self.product.price_for(self.variant),
        })
    }
}

fn clamp_quantity(quantity: i64, stock: i64) -> i64 {
    if stock < 1 {
        return 1;
    }
    quantity.clamp(1, stock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;
    use crate::money::{Currency, Money};

    fn product(variants: Vec<Variant>) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Tee".to_string(),
            description: String::new(),
            brand: None,
            category: None,
            price: Money::new(2000, Currency::USD),
            count_in_stock: 0,
            images: Vec::new(),
            rating: 0.0,
            num_reviews: 0,
            variants,
        }
    }

    fn red_tee() -> Product {
        product(vec![Variant::new("S", "red", 0), Variant::new("M", "red", 3)])
    }

    #[test]
    fn test_initial_state() {
        let p = red_tee();
        let selector = VariantSelector::new(&p);
        assert_eq!(selector.state(), SelectionState::NoSize);
        assert!(!selector.color_enabled());
        assert!(selector.color_options().is_empty());
        assert!(!selector.can_add_to_cart());
        assert_eq!(selector.message(), Some("Please select a size"));
    }

    #[test]
    fn test_small_red_is_out_of_stock() {
        let p = red_tee();
        let mut selector = VariantSelector::new(&p);
        selector.select_size("S").unwrap();
        assert_eq!(selector.state(), SelectionState::SizeSelected);

        let state = selector.select_color("red").unwrap();
        assert_eq!(state, SelectionState::OutOfStock);
        assert!(!selector.can_add_to_cart());
        assert!(selector.add_to_cart().is_err());
    }

    #[test]
    fn test_medium_red_clamps_quantity() {
        let p = red_tee();
        let mut selector = VariantSelector::new(&p);
        selector.select_size("M").unwrap();
        selector.select_color("red").unwrap();

        assert!(selector.can_add_to_cart());
        assert_eq!(selector.set_quantity(10), 3);
        assert_eq!(selector.set_quantity(0), 1);
        assert_eq!(selector.increment(), 2);
        assert_eq!(selector.decrement(), 1);
        assert_eq!(selector.decrement(), 1);

        selector.set_quantity(3);
        let item = selector.add_to_cart().unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(
            item.variant,
            Some(VariantChoice {
                size: "M".to_string(),
                color: "red".to_string()
            })
        );
    }

    #[test]
    fn test_color_requires_size() {
        let p = red_tee();
        let mut selector = VariantSelector::new(&p);
        assert!(selector.select_color("red").is_err());
        assert_eq!(selector.state(), SelectionState::NoSize);
    }

    #[test]
    fn test_unknown_size_rejected() {
        let p = red_tee();
        let mut selector = VariantSelector::new(&p);
        assert!(selector.select_size("XXL").is_err());
    }

    #[test]
    fn test_changing_size_clears_invalid_color() {
        let p = product(vec![
            Variant::new("M", "red", 3),
            Variant::new("L", "blue", 2),
        ]);
        let mut selector = VariantSelector::new(&p);
        selector.select_size("M").unwrap();
        selector.select_color("red").unwrap();

        let state = selector.select_size("L").unwrap();
        assert_eq!(state, SelectionState::SizeSelected);
        assert_eq!(selector.selected_color(), None);
        assert!(selector.resolved_variant().is_none());
    }

    #[test]
    fn test_changing_size_keeps_valid_color_and_reclamps() {
        let p = product(vec![
            Variant::new("M", "red", 5),
            Variant::new("L", "red", 2),
        ]);
        let mut selector = VariantSelector::new(&p);
        selector.select_size("M").unwrap();
        selector.select_color("red").unwrap();
        selector.set_quantity(5);

        let state = selector.select_size("L").unwrap();
        assert_eq!(state, SelectionState::Resolved);
        assert_eq!(selector.selected_color(), Some("red"));
        assert_eq!(selector.quantity(), 2);
    }

    #[test]
    fn test_unmatched_combination_is_unresolved() {
        let p = red_tee();
        let mut selector = VariantSelector::new(&p);
        selector.select_size("M").unwrap();
        let state = selector.select_color("green").unwrap();
        assert_eq!(state, SelectionState::Unresolved);
        assert!(selector.resolved_variant().is_none());
        assert_eq!(
            selector.message(),
            Some("This combination is not available")
        );
    }

    #[test]
    fn test_simple_product_uses_count_in_stock() {
        let mut p = product(Vec::new());
        p.count_in_stock = 4;
        let mut selector = VariantSelector::new(&p);
        assert_eq!(selector.state(), SelectionState::Resolved);
        assert_eq!(selector.set_quantity(9), 4);
        assert!(selector.select_size("M").is_err());

        let item = selector.add_to_cart().unwrap();
        assert!(item.variant.is_none());
        assert_eq!(item.unit_price.amount_cents, 2000);

        p.count_in_stock = 0;
        let selector = VariantSelector::new(&p);
        assert_eq!(selector.state(), SelectionState::OutOfStock);
        assert_eq!(selector.message(), Some("Out of stock"));
    }
}
