//! Interactive payment collection.

use async_trait::async_trait;
use chrono::Utc;
use dialoguer::{Confirm, Input, Password};
use store_commerce::checkout::{CardDetails, Order, PaymentResult};
use store_session::{CardForm, PaypalGateway, SessionError};

use crate::output::Output;

/// Card fields read from the terminal.
pub struct TerminalCardForm {
    output: Output,
}

impl TerminalCardForm {
    pub fn new(output: Output) -> Self {
        Self { output }
    }

    fn read(&self, order: &Order) -> dialoguer::Result<Option<CardDetails>> {
        self.output.header(&format!(
            "Card payment for order {} ({})",
            order.short_id(),
            order.totals.total_price
        ));

        if !Confirm::new()
            .with_prompt("Enter card details now?")
            .default(true)
            .interact()?
        {
            return Ok(None);
        }

        let holder: String = Input::new().with_prompt("Cardholder name").interact_text()?;
        let number: String = Input::new().with_prompt("Card number").interact_text()?;
        let expiry: String = Input::new().with_prompt("Expiry (MM/YY)").interact_text()?;
        let cvc = Password::new().with_prompt("CVC").interact()?;

        Ok(Some(CardDetails {
            holder,
            number,
            expiry,
            cvc,
        }))
    }
}

#[async_trait]
impl CardForm for TerminalCardForm {
    async fn collect(&self, order: &Order) -> Option<CardDetails> {
        match self.read(order) {
            Ok(card) => card,
            Err(e) => {
                self.output.warn(&format!("Card entry aborted: {}", e));
                None
            }
        }
    }
}

/// PayPal approval done in the browser, confirmed at the terminal.
pub struct PromptPaypal {
    output: Output,
}

impl PromptPaypal {
    pub fn new(output: Output) -> Self {
        Self { output }
    }

    fn read(&self, order: &Order) -> dialoguer::Result<Option<PaymentResult>> {
        self.output.header(&format!(
            "PayPal payment for order {} ({})",
            order.short_id(),
            order.totals.total_price
        ));
        self.output
            .info("Approve the payment in PayPal, then paste the capture id here.");

        if !Confirm::new()
            .with_prompt("Payment approved?")
            .default(false)
            .interact()?
        {
            return Ok(None);
        }

        let id: String = Input::new().with_prompt("Capture id").interact_text()?;
        let email: String = Input::new()
            .with_prompt("Payer email")
            .allow_empty(true)
            .interact_text()?;

        Ok(Some(PaymentResult {
            id: id.trim().to_string(),
            status: "COMPLETED".to_string(),
            update_time: Some(Utc::now().to_rfc3339()),
            email_address: Some(email.trim().to_string()).filter(|e| !e.is_empty()),
        }))
    }
}

#[async_trait]
impl PaypalGateway for PromptPaypal {
    async fn capture(&self, order: &Order) -> Result<PaymentResult, SessionError> {
        match self.read(order) {
            Ok(Some(result)) if !result.id.is_empty() => Ok(result),
            Ok(_) => Err(SessionError::PaymentCancelled),
            Err(e) => Err(SessionError::PaymentDeclined(format!(
                "PayPal approval failed: {}",
                e
            ))),
        }
    }
}
