//! Order types.

use crate::cart::{Cart, OrderTotals, PricingRules, VariantChoice};
use crate::checkout::{Address, PaymentMethod, PaymentResult};
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::Money;
use crate::CommerceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status, derived from the paid/delivered flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created but not paid.
    AwaitingPayment,
    /// Paid, not yet delivered.
    Paid,
    /// Delivered.
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingPayment => "awaiting_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::Delivered => "delivered",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingPayment => "Awaiting payment",
            OrderStatus::Paid => "Paid",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }
}

/// A line snapshotted from the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub variant: Option<VariantChoice>,
    pub quantity: i64,
    pub unit_price: Money,
}

impl OrderItem {
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// An order as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Customer, when the server populates it.
    pub user_id: Option<UserId>,
    /// Customer name, on admin listings.
    pub customer_name: Option<String>,
    /// Items in the order.
    pub items: Vec<OrderItem>,
    /// Shipping address.
    pub shipping_address: Address,
    /// Payment method chosen at checkout.
    pub payment_method: PaymentMethod,
    /// Price breakdown.
    pub totals: OrderTotals,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    /// Capture details, when paid through a payment button.
    pub payment_result: Option<PaymentResult>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        if self.is_delivered {
            OrderStatus::Delivered
        } else if self.is_paid {
            OrderStatus::Paid
        } else {
            OrderStatus::AwaitingPayment
        }
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Short id for listings.
    pub fn short_id(&self) -> &str {
        let id = self.id.as_str();
        let start = id.len().saturating_sub(8);
        id.get(start..).unwrap_or(id)
    }
}

/// Order payload assembled from the cart at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
}

impl NewOrder {
    /// Snapshot the cart and price it with `rules`.
    pub fn from_cart(
        cart: &Cart,
        shipping_address: Address,
        payment_method: PaymentMethod,
        rules: &PricingRules,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let missing = shipping_address.missing_fields();
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }

        let items = cart
            .items
            .iter()
            .map(|item| OrderItem {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                image: item.image.clone(),
                variant: item.variant.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        Ok(Self {
            items,
            shipping_address,
            payment_method,
            totals: rules.totals(cart.subtotal()?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::ids::CartItemId;
    use crate::money::Currency;

    fn cart() -> Cart {
        Cart::with_items(
            vec![CartItem {
                id: CartItemId::new("line-1"),
                product_id: ProductId::new("tee"),
                name: "Tee".to_string(),
                image: None,
                variant: Some(VariantChoice {
                    size: "M".to_string(),
                    color: "red".to_string(),
                }),
                unit_price: Money::new(2500, Currency::USD),
                quantity: 2,
                stock: Some(3),
            }],
            Currency::USD,
        )
    }

    fn address() -> Address {
        Address::new("Jane", "1 Main St", "Austin", "73301", "US")
    }

    #[test]
    fn test_new_order_from_cart() {
        let order = NewOrder::from_cart(
            &cart(),
            address(),
            PaymentMethod::BankTransfer,
            &PricingRules::default(),
        )
        .unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].line_total().unwrap().amount_cents, 5000);
        assert_eq!(order.totals.items_price.amount_cents, 5000);
        assert_eq!(order.totals.shipping_price.amount_cents, 1000);
        assert_eq!(order.totals.tax_price.amount_cents, 750);
        assert_eq!(order.totals.total_price.amount_cents, 6750);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let result = NewOrder::from_cart(
            &Cart::new(Currency::USD),
            address(),
            PaymentMethod::Paypal,
            &PricingRules::default(),
        );
        let err = result.unwrap_err();
        assert_eq!(err, CommerceError::EmptyCart);
        assert_eq!(err.to_string(), "Your cart is empty");
    }

    #[test]
    fn test_status_from_flags() {
        let new = NewOrder::from_cart(
            &cart(),
            address(),
            PaymentMethod::CreditCard,
            &PricingRules::default(),
        )
        .unwrap();
        let mut order = Order {
            id: OrderId::new("64f1c2aa0000000000abcdef"),
            user_id: None,
            customer_name: None,
            items: new.items,
            shipping_address: new.shipping_address,
            payment_method: new.payment_method,
            totals: new.totals,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            payment_result: None,
            created_at: None,
        };
        assert_eq!(order.status(), OrderStatus::AwaitingPayment);
        assert_eq!(order.short_id(), "00abcdef");
        assert_eq!(order.item_count(), 2);

        order.is_paid = true;
        assert_eq!(order.status(), OrderStatus::Paid);
        order.is_delivered = true;
        assert!(order.status().is_terminal());
    }
}
