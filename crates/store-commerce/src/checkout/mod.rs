//! Checkout module.
//!
//! Contains the checkout wizard, addresses, payment methods, and orders.

mod address;
mod order;
mod payment;
mod wizard;

pub use address::Address;
pub use order::{NewOrder, Order, OrderItem, OrderStatus};
pub use payment::{CardDetails, PaymentDetails, PaymentMethod, PaymentResult};
pub use wizard::{CheckoutStep, CheckoutWizard, ShippingChoice, SubmitPlan};
