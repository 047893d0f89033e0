//! Storefront REST API, one module per resource.
//!
//! Wire payloads are camelCase JSON with `_id` identifiers and loosely typed
//! prices. Each module deserializes into private DTOs and converts them into
//! `store_commerce` types before returning, so callers never see the wire
//! shapes.
//!
//! # Example
//!
//! ```rust,ignore
//! use store_api::{ProductQuery, StoreApi};
//!
//! let api = StoreApi::new(client);
//! let page = api.products().list(&ProductQuery {
//!     keyword: Some("shirt".into()),
//!     ..Default::default()
//! }).await?;
//! ```

mod addresses;
mod auth;
mod cart;
mod orders;
mod payment;
mod products;
mod reviews;
mod users;
mod wire;
mod wishlist;

pub use addresses::AddressesApi;
pub use auth::{AuthApi, AuthSession, PasswordApi, ProfileUpdate};
pub use cart::CartApi;
pub use orders::OrdersApi;
pub use payment::{PaymentApi, PaymentReceipt, PaymentRequest};
pub use products::{ProductInput, ProductPage, ProductQuery, ProductsApi};
pub use reviews::ReviewsApi;
pub use users::{UserUpdate, UsersApi};
pub use wire::MessageResponse;
pub use wishlist::WishlistApi;

use store_commerce::Currency;
use store_data::ApiClient;

/// Entry point to every resource.
#[derive(Debug, Clone)]
pub struct StoreApi {
    client: ApiClient,
    currency: Currency,
}

impl StoreApi {
    /// Prices are read as USD unless [`StoreApi::with_currency`] says otherwise.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            currency: Currency::USD,
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { api: self }
    }

    pub fn password(&self) -> PasswordApi<'_> {
        PasswordApi { api: self }
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { api: self }
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { api: self }
    }

    pub fn cart(&self) -> CartApi<'_> {
        CartApi { api: self }
    }

    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi { api: self }
    }

    pub fn addresses(&self) -> AddressesApi<'_> {
        AddressesApi { api: self }
    }

    pub fn reviews(&self) -> ReviewsApi<'_> {
        ReviewsApi { api: self }
    }

    pub fn wishlist(&self) -> WishlistApi<'_> {
        WishlistApi { api: self }
    }

    pub fn payment(&self) -> PaymentApi<'_> {
        PaymentApi { api: self }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::StoreApi;
    use std::sync::Arc;
    use store_data::mock::MockTransport;
    use store_data::{ApiClient, MemoryTokenStore};

    pub(crate) fn api_with_mock() -> (StoreApi, MockTransport) {
        let mock = MockTransport::new();
        let client = ApiClient::with_transport(
            "http://mock.test/api",
            Arc::new(mock.clone()),
            Arc::new(MemoryTokenStore::with_token("test-token")),
        );
        (StoreApi::new(client), mock)
    }
}
