//! Product catalog module.
//!
//! Contains types for products, variants, reviews, and variant selection.

mod product;
mod review;
mod selection;

pub use product::{ColorOption, Product, Variant};
pub use review::{average_rating, NewReview, Review, ReviewStatus};
pub use selection::{SelectionState, VariantSelector};
