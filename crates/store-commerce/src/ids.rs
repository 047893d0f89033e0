//! Newtype IDs for type-safe identifiers.
//!
//! All identifiers are assigned by the server (document ids on the wire), so
//! the client only wraps them. Keeping them distinct prevents passing a
//! `ProductId` where a `CartItemId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A server-assigned identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CartItemId);
define_id!(OrderId);
define_id!(UserId);
define_id!(AddressId);
define_id!(ReviewId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("64b7f0c2a1");
        assert_eq!(id.as_str(), "64b7f0c2a1");
    }

    #[test]
    fn test_id_from_string() {
        let id: OrderId = "ord-456".into();
        assert_eq!(id.as_str(), "ord-456");
        assert_eq!(id.into_inner(), "ord-456");
    }

    #[test]
    fn test_id_display() {
        let id = CartItemId::new("line-789");
        assert_eq!(format!("{}", id), "line-789");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = UserId::new("u1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u1\"");

        let back: UserId = serde_json::from_str("\"u2\"").unwrap();
        assert_eq!(back, UserId::new("u2"));
    }
}
