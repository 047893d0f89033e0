//! Shared wire shapes and conversion helpers.

use serde::{Deserialize, Serialize};
use store_commerce::{CommerceError, Currency, Money, RawPrice};
use store_data::{ApiError, FetchError};

/// A payload that failed domain validation.
pub(crate) fn invalid(e: CommerceError) -> ApiError {
    ApiError::Fetch(FetchError::ParseError(e.to_string()))
}

pub(crate) fn money(raw: &RawPrice, currency: Currency) -> Result<Money, ApiError> {
    raw.to_money(currency).map_err(invalid)
}

pub(crate) fn optional_money(
    raw: Option<&RawPrice>,
    currency: Currency,
) -> Result<Option<Money>, ApiError> {
    raw.map(|r| money(r, currency)).transpose()
}

/// Documents carry their id as `_id`.
pub(crate) trait Document {
    fn doc_id(&self) -> &str;
}

/// A reference field that is either a bare id or a populated document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Populated<T> {
    Id(String),
    Doc(T),
}

impl<T: Document> Populated<T> {
    pub(crate) fn id(&self) -> &str {
        match self {
            Populated::Id(id) => id,
            Populated::Doc(doc) => doc.doc_id(),
        }
    }

    pub(crate) fn doc(&self) -> Option<&T> {
        match self {
            Populated::Id(_) => None,
            Populated::Doc(doc) => Some(doc),
        }
    }
}

/// Just an id.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdDto {
    #[serde(rename = "_id")]
    pub id: String,
}

impl Document for IdDto {
    fn doc_id(&self) -> &str {
        &self.id
    }
}

/// A populated user reference.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserRefDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Document for UserRefDto {
    fn doc_id(&self) -> &str {
        &self.id
    }
}

/// `{ "message": "..." }` bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
