//! Storefront domain types and client-side logic.
//!
//! Everything in this crate is synchronous and free of I/O. Server payloads are
//! normalized into these types at the API boundary, and the presentation layer
//! drives the state machines defined here:
//!
//! - **Catalog**: products, variants, reviews, and the variant selector
//! - **Cart**: cart items, line totals, order pricing rules
//! - **Wishlist**: saved-for-later product references
//! - **Checkout**: addresses, payment methods, the three-step wizard, orders
//!
//! # Example
//!
//! ```rust,ignore
//! use store_commerce::prelude::*;
//!
//! let mut selector = VariantSelector::new(&product);
//! selector.select_size("M")?;
//! selector.select_color("red")?;
//! selector.set_quantity(2);
//!
//! if selector.can_add_to_cart() {
//!     let item = selector.add_to_cart()?;
//!     // hand `item` to the cart store
//! }
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod user;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money, RawPrice};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money, RawPrice};
    pub use crate::user::{Role, User};

    // Catalog
    pub use crate::catalog::{
        ColorOption, NewReview, Product, Review, ReviewStatus, SelectionState, Variant,
        VariantSelector,
    };

    // Cart
    pub use crate::cart::{
        Cart, CartItem, CartPricing, LineItemPricing, NewCartItem, OrderTotals, PricingRules,
        VariantChoice,
    };

    // Wishlist
    pub use crate::wishlist::{Wishlist, WishlistItem};

    // Checkout
    pub use crate::checkout::{
        Address, CardDetails, CheckoutStep, CheckoutWizard, NewOrder, Order, OrderItem,
        OrderStatus, PaymentDetails, PaymentMethod, PaymentResult, ShippingChoice, SubmitPlan,
    };
}
