//! Product and variant types.

use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    pub description: String,
    /// Brand name.
    pub brand: Option<String>,
    /// Category name.
    pub category: Option<String>,
    /// Base price.
    pub price: Money,
    /// Stock for products without variants.
    pub count_in_stock: i64,
    /// Image URLs, first is the primary image.
    pub images: Vec<String>,
    /// Average rating (0-5).
    pub rating: f64,
    /// Number of approved reviews.
    pub num_reviews: u32,
    /// Size/color variants, empty for simple products.
    pub variants: Vec<Variant>,
}

impl Product {
    /// Check if this product has variants to select from.
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Total units available across all variants (or the product stock).
    pub fn total_stock(&self) -> i64 {
        if self.has_variants() {
            self.variants.iter().map(|v| v.stock.max(0)).sum()
        } else {
            self.count_in_stock.max(0)
        }
    }

    /// Check if anything can be bought.
    pub fn is_in_stock(&self) -> bool {
        self.total_stock() > 0
    }

    /// Primary image URL.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Distinct sizes, in the order the variants list them.
    pub fn sizes(&self) -> Vec<&str> {
        let mut sizes: Vec<&str> = Vec::new();
        for variant in &self.variants {
            if !sizes.contains(&variant.size.as_str()) {
                sizes.push(&variant.size);
            }
        }
        sizes
    }

    /// Colors offered for a size, with their in-stock flags.
    ///
    /// Duplicate size/color rows are merged; the color is in stock if any of
    /// them has stock.
    pub fn color_options(&self, size: &str) -> Vec<ColorOption> {
        let mut options: Vec<ColorOption> = Vec::new();
        for variant in self.variants.iter().filter(|v| v.size == size) {
            match options.iter_mut().find(|o| o.color == variant.color) {
                Some(existing) => existing.in_stock |= variant.is_in_stock(),
                None => options.push(ColorOption {
                    color: variant.color.clone(),
                    in_stock: variant.is_in_stock(),
                }),
            }
        }
        options
    }

    /// Exact size+color lookup.
    pub fn find_variant(&self, size: &str, color: &str) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.size == size && v.color == color)
    }

    /// Price for a variant, falling back to the product price.
    pub fn price_for(&self, variant: Option<&Variant>) -> Money {
        variant.and_then(|v| v.price).unwrap_or(self.price)
    }
}

/// A size/color stock-keeping unit of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Variant id, when the server assigns one.
    pub id: Option<VariantId>,
    /// Size label (e.g., "M").
    pub size: String,
    /// Color label (e.g., "red").
    pub color: String,
    /// Units in stock.
    pub stock: i64,
    /// Price override for this variant.
    pub price: Option<Money>,
}

impl Variant {
    /// Create a variant with no price override.
    pub fn new(size: impl Into<String>, color: impl Into<String>, stock: i64) -> Self {
        Self {
            id: None,
            size: size.into(),
            color: color.into(),
            stock,
            price: None,
        }
    }

    /// Check if this variant is in stock.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Human label (e.g., "M / red").
    pub fn label(&self) -> String {
        format!("{} / {}", self.size, self.color)
    }
}

/// A color choice for the currently selected size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorOption {
    /// Color label.
    pub color: String,
    /// Whether the size+color combination has stock.
    pub in_stock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn shirt() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Tee".to_string(),
            description: "Cotton tee".to_string(),
            brand: None,
            category: Some("Shirts".to_string()),
            price: Money::new(2000, Currency::USD),
            count_in_stock: 0,
            images: vec!["/img/tee.jpg".to_string()],
            rating: 4.5,
            num_reviews: 2,
            variants: vec![
                Variant::new("S", "red", 0),
                Variant::new("M", "red", 3),
                Variant::new("M", "blue", 1),
                Variant::new("L", "blue", 0),
            ],
        }
    }

    #[test]
    fn test_sizes_are_distinct_and_ordered() {
        assert_eq!(shirt().sizes(), vec!["S", "M", "L"]);
    }

    #[test]
    fn test_color_options_for_size() {
        let product = shirt();
        let options = product.color_options("M");
        assert_eq!(
            options,
            vec![
                ColorOption { color: "red".to_string(), in_stock: true },
                ColorOption { color: "blue".to_string(), in_stock: true },
            ]
        );

        let options = product.color_options("S");
        assert_eq!(options.len(), 1);
        assert!(!options[0].in_stock);
    }

    #[test]
    fn test_duplicate_rows_merge_stock_flag() {
        let mut product = shirt();
        product.variants.push(Variant::new("S", "red", 2));
        let options = product.color_options("S");
        assert_eq!(options.len(), 1);
        assert!(options[0].in_stock);
    }

    #[test]
    fn test_stock_totals() {
        let product = shirt();
        assert_eq!(product.total_stock(), 4);
        assert!(product.is_in_stock());

        let mut simple = shirt();
        simple.variants.clear();
        simple.count_in_stock = 7;
        assert_eq!(simple.total_stock(), 7);
    }

    #[test]
    fn test_variant_price_override() {
        let mut product = shirt();
        product.variants[1].price = Some(Money::new(2500, Currency::USD));
        let variant = product.find_variant("M", "red");
        assert_eq!(product.price_for(variant).amount_cents, 2500);
        assert_eq!(product.price_for(None).amount_cents, 2000);
    }
}
