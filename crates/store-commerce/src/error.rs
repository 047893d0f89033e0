//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in client-side commerce operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Requested quantity is larger than the available stock.
    #[error("Only {available} left in stock, requested {requested}")]
    InsufficientStock { requested: i64, available: i64 },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Variant selection is not valid for the product.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The current selection cannot be added to the cart.
    #[error("Cannot add to cart: {0}")]
    NotPurchasable(String),

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// An order cannot be built from an empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A checkout submit is already running.
    #[error("Checkout submission already in progress")]
    SubmitInProgress,

    /// Price could not be normalized.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
