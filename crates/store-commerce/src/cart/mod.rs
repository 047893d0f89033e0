//! Shopping cart module.
//!
//! Contains types for the cart, its items, and order pricing.

mod cart;
mod pricing;

pub use cart::{Cart, CartItem, NewCartItem, VariantChoice, MAX_QUANTITY_PER_ITEM};
pub use pricing::{CartPricing, LineItemPricing, OrderTotals, PricingRules};
