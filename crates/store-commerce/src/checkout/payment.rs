//! Payment methods and client-side card validation.
//!
//! There is no processor integration here. Card fields are format-checked
//! before the generic process-payment call; PayPal capture details come back
//! from the payment-button integration as a [`PaymentResult`].

use crate::CommerceError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    CashOnDelivery,
}

impl PaymentMethod {
    /// All methods in display order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Paypal,
        PaymentMethod::BankTransfer,
        PaymentMethod::CashOnDelivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }

    /// Whether the customer has to enter or approve something after the
    /// order is created.
    pub fn is_interactive(&self) -> bool {
        matches!(self, PaymentMethod::CreditCard | PaymentMethod::Paypal)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PaymentMethod {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "credit_card" | "card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "cash_on_delivery" | "cod" => Ok(PaymentMethod::CashOnDelivery),
            _ => Err(CommerceError::ValidationError(format!(
                "unknown payment method: {s}"
            ))),
        }
    }
}

/// Card fields collected in the payment modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardDetails {
    pub holder: String,
    pub number: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvc: String,
}

impl CardDetails {
    /// Card number with spaces and dashes removed.
    pub fn digits(&self) -> String {
        self.number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect()
    }

    /// Last four digits, for receipts.
    pub fn last4(&self) -> String {
        let digits = self.digits();
        let start = digits.len().saturating_sub(4);
        digits[start..].to_string()
    }

    /// Format-only validation against `today`.
    ///
    /// All problems are reported at once, separated by `; `.
    pub fn validate(&self, today: NaiveDate) -> Result<(), CommerceError> {
        let mut problems = Vec::new();

        if self.holder.trim().is_empty() {
            problems.push("Cardholder name is required");
        }

        let digits = self.digits();
        if !(13..=19).contains(&digits.len())
            || !digits.chars().all(|c| c.is_ascii_digit())
            || !luhn_valid(&digits)
        {
            problems.push("Card number is invalid");
        }

        match parse_expiry(&self.expiry) {
            None => problems.push("Expiry must be MM/YY"),
            Some((month, year)) => {
                if (year, month) < (today.year(), today.month()) {
                    problems.push("Card has expired");
                }
            }
        }

        let cvc = self.cvc.trim();
        if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
            problems.push("CVC must be 3 or 4 digits");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::ValidationError(problems.join("; ")))
        }
    }
}

fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

fn parse_expiry(expiry: &str) -> Option<(u32, i32)> {
    let (month, year) = expiry.trim().split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let year = year.trim();
    if !(1..=12).contains(&month) || year.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    Some((month, 2000 + year))
}

/// Capture details returned by an external payment button.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentResult {
    pub id: String,
    pub status: String,
    pub update_time: Option<String>,
    pub email_address: Option<String>,
}

/// What accompanies a process-payment call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentDetails {
    /// Card summary; the full number and CVC never leave the form.
    Card {
        holder: String,
        last4: String,
        expiry: String,
    },
    /// Capture from the payment button.
    Paypal(PaymentResult),
    /// Bank transfer and cash on delivery.
    Offline,
}

impl From<&CardDetails> for PaymentDetails {
    fn from(card: &CardDetails) -> Self {
        PaymentDetails::Card {
            holder: card.holder.trim().to_string(),
            last4: card.last4(),
            expiry: card.expiry.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn card() -> CardDetails {
        CardDetails {
            holder: "Ada Lovelace".to_string(),
            number: "4242 4242 4242 4242".to_string(),
            expiry: "12/27".to_string(),
            cvc: "123".to_string(),
        }
    }

    #[test]
    fn test_valid_card() {
        assert!(card().validate(today()).is_ok());
        assert_eq!(card().last4(), "4242");
    }

    #[test]
    fn test_luhn_failure() {
        let mut c = card();
        c.number = "4242 4242 4242 4241".to_string();
        let err = c.validate(today()).unwrap_err();
        assert_eq!(
            err,
            CommerceError::ValidationError("Card number is invalid".to_string())
        );
    }

    #[test]
    fn test_expiry_rules() {
        let mut c = card();
        c.expiry = "10/26".to_string();
        assert!(c.validate(today()).is_ok(), "current month is still valid");

        c.expiry = "09/26".to_string();
        assert!(c.validate(today()).is_err());

        c.expiry = "13/30".to_string();
        assert!(c.validate(today()).is_err());

        c.expiry = "1230".to_string();
        assert!(c.validate(today()).is_err());
    }

    #[test]
    fn test_reports_every_problem() {
        let c = CardDetails::default();
        let CommerceError::ValidationError(msg) = c.validate(today()).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(msg.split("; ").count(), 4);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("paypal".parse::<PaymentMethod>().unwrap(), PaymentMethod::Paypal);
        assert_eq!(
            "Cash on Delivery".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CashOnDelivery
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
    }

    #[test]
    fn test_card_summary_hides_number() {
        let details = PaymentDetails::from(&card());
        let json = serde_json::to_string(&details).unwrap();
        assert!(!json.contains("4242 4242"));
        assert!(json.contains("\"last4\":\"4242\""));
    }
}
