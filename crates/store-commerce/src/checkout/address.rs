//! Shipping address types.

use crate::ids::AddressId;
use serde::{Deserialize, Serialize};

/// A shipping address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    /// Address ID (None for unsaved addresses).
    pub id: Option<AddressId>,
    /// Recipient name.
    pub full_name: String,
    /// Street line.
    pub address: String,
    /// City.
    pub city: String,
    /// Postal/ZIP code.
    pub postal_code: String,
    /// Country.
    pub country: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Whether this is the user's default address.
    pub is_default: bool,
}

impl Address {
    /// Create a new unsaved address.
    pub fn new(
        full_name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            full_name: full_name.into(),
            address: address.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            phone: None,
            is_default: false,
        }
    }

    /// Whether the address was loaded from the saved-address list.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("full name", &self.full_name),
            ("address", &self.address),
            ("city", &self.city),
            ("postal code", &self.postal_code),
            ("country", &self.country),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Check if address is complete.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.full_name, self.address, self.city, self.postal_code, self.country
        )
    }

    /// Format as multi-line.
    pub fn multi_line(&self) -> String {
        let mut lines = vec![
            self.full_name.clone(),
            self.address.clone(),
            format!("{} {}", self.city, self.postal_code),
            self.country.clone(),
        ];
        if let Some(ref phone) = self.phone {
            lines.push(phone.clone());
        }
        lines.join("\n")
    }
}
