//! Session error types.

use store_commerce::CommerceError;
use store_data::{ApiError, FetchError};
use thiserror::Error;

/// Errors surfaced by stores, guards and checkout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// The page needs a signed-in user.
    #[error("Please sign in to continue")]
    NotAuthenticated,

    /// The page needs an admin.
    #[error("Admin access required")]
    Forbidden,

    /// The payment endpoint or gateway refused the payment.
    #[error("{0}")]
    PaymentDeclined(String),

    /// The customer closed the payment form.
    #[error("Payment cancelled")]
    PaymentCancelled,
}

impl From<FetchError> for SessionError {
    fn from(e: FetchError) -> Self {
        SessionError::Api(ApiError::Fetch(e))
    }
}

impl SessionError {
    /// Text for inline display. Server messages pass through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Api(e) => e.user_message(),
            SessionError::Commerce(CommerceError::ValidationError(msg)) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionError::Api(e) if e.is_cancelled())
    }
}
