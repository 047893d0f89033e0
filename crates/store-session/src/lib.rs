//! Session state and checkout orchestration for the storefront client.
//!
//! The stores here own the server state a signed-in customer works with:
//!
//! - [`AuthStore`]: the current user
//! - [`CartStore`]: the cart, with optimistic quantity edits
//! - [`WishlistStore`]: saved products, with optimistic toggles
//!
//! [`Session`] ties them to the token lifecycle and re-syncs them on login,
//! logout and restore. [`CheckoutService`] runs the review-step submit of a
//! [`CheckoutWizard`](store_commerce::checkout::CheckoutWizard).
//!
//! # Example
//!
//! ```rust,ignore
//! use store_session::{Access, Session};
//!
//! let session = Session::new(api);
//! session.restore().await?;
//! let admin = session.require(Access::Admin).await?;
//! ```

mod auth;
mod cart;
mod checkout;
mod error;
mod guard;
mod session;
mod wishlist;

pub use auth::AuthStore;
pub use cart::CartStore;
pub use checkout::{CardForm, CheckoutService, PaypalGateway};
pub use error::SessionError;
pub use guard::Access;
pub use session::Session;
pub use wishlist::WishlistStore;
