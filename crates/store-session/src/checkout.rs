//! Step-3 submit: create the order, take payment, clear the cart.

use crate::{Access, Session, SessionError};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use store_api::{PaymentReceipt, PaymentRequest};
use store_commerce::cart::PricingRules;
use store_commerce::checkout::{
    CardDetails, CheckoutWizard, NewOrder, Order, PaymentDetails, PaymentMethod, PaymentResult,
    SubmitPlan,
};
use tracing::{debug, info, warn};

/// Collects card fields for an order. `None` means the customer cancelled.
#[async_trait]
pub trait CardForm: Send + Sync {
    async fn collect(&self, order: &Order) -> Option<CardDetails>;
}

/// Payment-button integration that approves and captures a PayPal payment.
#[async_trait]
pub trait PaypalGateway: Send + Sync {
    async fn capture(&self, order: &Order) -> Result<PaymentResult, SessionError>;
}

/// Runs checkout submits against a session.
pub struct CheckoutService<'s> {
    session: &'s Session,
    rules: PricingRules,
    card_form: Arc<dyn CardForm>,
    paypal: Arc<dyn PaypalGateway>,
}

impl<'s> CheckoutService<'s> {
    pub fn new(
        session: &'s Session,
        rules: PricingRules,
        card_form: Arc<dyn CardForm>,
        paypal: Arc<dyn PaypalGateway>,
    ) -> Self {
        Self {
            session,
            rules,
            card_form,
            paypal,
        }
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Submit the wizard's review step.
    ///
    /// On failure the wizard stays on the review step with the error message.
    /// An order created before the failure is remembered, so the next submit
    /// only retries payment.
    pub async fn submit(&self, wizard: &mut CheckoutWizard) -> Result<Order, SessionError> {
        self.session.require(Access::Authenticated).await?;
        let plan = wizard.begin_submit()?;

        match self.place(wizard, plan).await {
            Ok(order) => {
                wizard.finish(order.id.clone());
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "checkout failed");
                wizard.fail(e.user_message());
                Err(e)
            }
        }
    }

    /// Pay an order that was created but never paid.
    pub async fn pay_existing(&self, order: &Order) -> Result<Order, SessionError> {
        self.session.require(Access::Authenticated).await?;
        if order.is_paid {
            return Ok(order.clone());
        }
        self.take_payment(order).await?;
        Ok(self.session.api().orders().get(&order.id).await?)
    }

    async fn place(
        &self,
        wizard: &mut CheckoutWizard,
        plan: SubmitPlan,
    ) -> Result<Order, SessionError> {
        let api = self.session.api();

        let order = match &plan.existing_order {
            Some(id) => {
                debug!(order_id = %id, "retrying payment for pending order");
                api.orders().get(id).await?
            }
            None => {
                let cart = self.session.cart().snapshot().await;
                let new_order =
                    NewOrder::from_cart(&cart, plan.address.clone(), plan.method, &self.rules)?;
                if plan.persist_address {
                    let saved = api.addresses().create(&plan.address).await?;
                    wizard.address_saved(saved);
                }
                let order = api.orders().create(&new_order).await?;
                wizard.order_created(order.id.clone());
                order
            }
        };

        if !order.is_paid {
            self.take_payment(&order).await?;
        }

        if let Err(e) = self.session.cart().clear().await {
            warn!(error = %e, "cart clear after checkout failed");
        }

        info!(
            order_id = %order.id,
            method = plan.method.as_str(),
            total_cents = order.totals.total_price.amount_cents,
            "order placed"
        );
        Ok(order)
    }

    async fn take_payment(&self, order: &Order) -> Result<PaymentReceipt, SessionError> {
        let details = self.payment_details(order).await?;
        let request = PaymentRequest {
            order_id: order.id.clone(),
            method: order.payment_method,
            amount: order.totals.total_price,
            details,
        };

        let receipt = self.session.api().payment().process(&request).await?;
        if !receipt.success {
            let message = receipt
                .message
                .unwrap_or_else(|| "Payment was declined".to_string());
            return Err(SessionError::PaymentDeclined(message));
        }

        debug!(
            order_id = %order.id,
            transaction_id = receipt.transaction_id.as_deref().unwrap_or(""),
            "payment accepted"
        );
        Ok(receipt)
    }

    async fn payment_details(&self, order: &Order) -> Result<PaymentDetails, SessionError> {
        match order.payment_method {
            PaymentMethod::CreditCard => {
                let card = self
                    .card_form
                    .collect(order)
                    .await
                    .ok_or(SessionError::PaymentCancelled)?;
                card.validate(Utc::now().date_naive())?;
                Ok(PaymentDetails::from(&card))
            }
            PaymentMethod::Paypal => {
                let capture = self.paypal.capture(order).await?;
                Ok(PaymentDetails::Paypal(capture))
            }
            PaymentMethod::BankTransfer | PaymentMethod::CashOnDelivery => {
                Ok(PaymentDetails::Offline)
            }
        }
    }
}
