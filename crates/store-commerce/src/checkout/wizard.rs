//! Three-step checkout wizard.
//!
//! Shipping → Payment → Review, one step at a time in either direction.
//! The wizard only tracks state; the network calls behind the review step are
//! made by the caller, which reports back through [`CheckoutWizard::order_created`],
//! [`CheckoutWizard::fail`] and [`CheckoutWizard::finish`].

use crate::checkout::{Address, PaymentMethod};
use crate::ids::OrderId;
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Shipping address.
    Shipping,
    /// Payment method.
    Payment,
    /// Order review and submission.
    Review,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Review => 3,
        }
    }
}

/// Address given on the shipping step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShippingChoice {
    /// One of the user's saved addresses.
    Saved(Address),
    /// Typed in during checkout; saved to the address book on submit.
    New(Address),
}

impl ShippingChoice {
    pub fn address(&self) -> &Address {
        match self {
            ShippingChoice::Saved(a) | ShippingChoice::New(a) => a,
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            ShippingChoice::Saved(a) if a.is_saved() => Vec::new(),
            ShippingChoice::Saved(_) => vec!["saved address"],
            ShippingChoice::New(a) => a.missing_fields(),
        }
    }
}

/// What the caller has to do to place the order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitPlan {
    pub address: Address,
    /// Save `address` to the address book before creating the order.
    pub persist_address: bool,
    pub method: PaymentMethod,
    /// Order created by an earlier attempt; skip creation and pay this one.
    pub existing_order: Option<OrderId>,
}

/// Checkout wizard state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutWizard {
    step: CheckoutStep,
    shipping: Option<ShippingChoice>,
    payment_method: Option<PaymentMethod>,
    pending_order: Option<OrderId>,
    completed_order: Option<OrderId>,
    submitting: bool,
    error: Option<String>,
}

impl Default for CheckoutWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutWizard {
    pub fn new() -> Self {
        Self {
            step: CheckoutStep::Shipping,
            shipping: None,
            payment_method: None,
            pending_order: None,
            completed_order: None,
            submitting: false,
            error: None,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Inline message from the last failed action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn shipping(&self) -> Option<&ShippingChoice> {
        self.shipping.as_ref()
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping.as_ref().map(ShippingChoice::address)
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// Order created by a submit whose payment has not gone through.
    pub fn pending_order(&self) -> Option<&OrderId> {
        self.pending_order.as_ref()
    }

    pub fn completed_order(&self) -> Option<&OrderId> {
        self.completed_order.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_order.is_some()
    }

    /// Submit step 1.
    ///
    /// On validation failure the wizard stays on step 1 and records a
    /// message naming the missing fields.
    pub fn submit_shipping(&mut self, choice: ShippingChoice) -> Result<CheckoutStep, CommerceError> {
        self.expect_step(CheckoutStep::Shipping, CheckoutStep::Payment)?;

        let missing = choice.missing_fields();
        if !missing.is_empty() {
            let err = CommerceError::CheckoutIncomplete(missing.join(", "));
            self.error = Some(format!("Please fill in: {}", missing.join(", ")));
            return Err(err);
        }

        self.shipping = Some(choice);
        self.error = None;
        self.step = CheckoutStep::Payment;
        Ok(self.step)
    }

    /// Submit step 2.
    pub fn select_payment_method(
        &mut self,
        method: PaymentMethod,
    ) -> Result<CheckoutStep, CommerceError> {
        self.expect_step(CheckoutStep::Payment, CheckoutStep::Review)?;

        self.payment_method = Some(method);
        self.error = None;
        self.step = CheckoutStep::Review;
        Ok(self.step)
    }

    /// Go back one step.
    ///
    /// Locked once an order exists, since its address and payment method are
    /// already recorded server-side.
    pub fn back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = match self.step {
            CheckoutStep::Shipping => None,
            CheckoutStep::Payment => Some(CheckoutStep::Shipping),
            CheckoutStep::Review => Some(CheckoutStep::Payment),
        };

        let Some(prev) = prev.filter(|_| {
            !self.submitting && self.pending_order.is_none() && !self.is_complete()
        }) else {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "back".to_string(),
            });
        };

        self.step = prev;
        self.error = None;
        Ok(prev)
    }

    /// Start the step-3 submit.
    pub fn begin_submit(&mut self) -> Result<SubmitPlan, CommerceError> {
        if self.submitting {
            return Err(CommerceError::SubmitInProgress);
        }
        if self.step != CheckoutStep::Review || self.is_complete() {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "submit".to_string(),
            });
        }

        let (Some(shipping), Some(method)) = (&self.shipping, self.payment_method) else {
            return Err(CommerceError::CheckoutIncomplete(
                "shipping address or payment method".to_string(),
            ));
        };

        let plan = SubmitPlan {
            address: shipping.address().clone(),
            persist_address: matches!(shipping, ShippingChoice::New(_))
                && self.pending_order.is_none(),
            method,
            existing_order: self.pending_order.clone(),
        };

        self.submitting = true;
        self.error = None;
        Ok(plan)
    }

    /// Record that the shipping address is now in the address book, so a
    /// retried submit does not save it again.
    pub fn address_saved(&mut self, address: Address) {
        if matches!(self.shipping, Some(ShippingChoice::New(_))) {
            self.shipping = Some(ShippingChoice::Saved(address));
        }
    }

    /// Record the order created during the current submit.
    pub fn order_created(&mut self, order_id: OrderId) {
        self.pending_order = Some(order_id);
    }

    /// End the current submit with an error, staying on the current step.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    /// End the current submit successfully.
    pub fn finish(&mut self, order_id: OrderId) {
        self.submitting = false;
        self.error = None;
        self.pending_order = None;
        self.completed_order = Some(order_id);
    }

    fn expect_step(&self, current: CheckoutStep, next: CheckoutStep) -> Result<(), CommerceError> {
        if self.step != current || self.submitting || self.pending_order.is_some() {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        Ok(())
    }
}
