//! Cart pricing and order totals.

use crate::ids::CartItemId;
use crate::money::{Currency, Money};
use crate::CommerceError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of all line totals.
    pub subtotal: Money,
    /// Sum of quantities.
    pub item_count: i64,
    /// Per-line breakdown.
    pub line_items: Vec<LineItemPricing>,
}

/// Pricing breakdown for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Line item ID.
    pub line_item_id: CartItemId,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub total: Money,
}

/// Shipping and tax rules applied when an order is assembled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingRules {
    /// Orders at or above this subtotal ship free.
    pub free_shipping_threshold: Money,
    /// Shipping fee below the threshold.
    pub flat_shipping: Money,
    /// Tax rate as a fraction (0.15 = 15%).
    pub tax_rate: Decimal,
}

impl PricingRules {
    /// Rules in the given currency with the default store policy.
    pub fn standard(currency: Currency) -> Self {
        Self {
            free_shipping_threshold: Money::new(10_000, currency),
            flat_shipping: Money::new(1_000, currency),
            tax_rate: Decimal::new(15, 2),
        }
    }

    /// Shipping for a subtotal.
    pub fn shipping_for(&self, items_price: &Money) -> Money {
        if items_price.is_zero()
            || items_price.amount_cents >= self.free_shipping_threshold.amount_cents
        {
            Money::zero(items_price.currency)
        } else {
            Money::new(self.flat_shipping.amount_cents, items_price.currency)
        }
    }

    /// Full order breakdown for a subtotal.
    pub fn totals(&self, items_price: Money) -> Result<OrderTotals, CommerceError> {
        let shipping_price = self.shipping_for(&items_price);
        let tax_price = items_price.apply_rate(self.tax_rate)?;
        let total_price = Money::try_sum(
            [items_price, shipping_price, tax_price].iter(),
            items_price.currency,
        )
        .ok_or(CommerceError::Overflow)?;

        Ok(OrderTotals {
            items_price,
            shipping_price,
            tax_price,
            total_price,
        })
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        Self::standard(Currency::USD)
    }
}

/// Price breakdown stored on an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrderTotals {
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_charged_below_threshold() {
        let rules = PricingRules::default();
        let totals = rules.totals(Money::new(4000, Currency::USD)).unwrap();
        assert_eq!(totals.shipping_price.amount_cents, 1000);
        assert_eq!(totals.tax_price.amount_cents, 600);
        assert_eq!(totals.total_price.amount_cents, 5600);
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let rules = PricingRules::default();
        let totals = rules.totals(Money::new(10_000, Currency::USD)).unwrap();
        assert!(totals.shipping_price.is_zero());
        assert_eq!(totals.total_price.amount_cents, 11_500);
    }

    #[test]
    fn test_empty_order_has_no_shipping() {
        let rules = PricingRules::default();
        let totals = rules.totals(Money::zero(Currency::USD)).unwrap();
        assert!(totals.total_price.is_zero());
    }
}
