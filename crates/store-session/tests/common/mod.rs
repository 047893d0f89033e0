#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use store_api::StoreApi;
use store_data::mock::MockTransport;
use store_data::{ApiClient, MemoryTokenStore};
use store_session::Session;

pub fn session_with(tokens: MemoryTokenStore) -> (Session, MockTransport) {
    let mock = MockTransport::new();
    let client = ApiClient::with_transport(
        "http://mock.test/api",
        Arc::new(mock.clone()),
        Arc::new(tokens),
    );
    (Session::new(StoreApi::new(client)), mock)
}

pub fn signed_out() -> (Session, MockTransport) {
    session_with(MemoryTokenStore::new())
}

pub fn user_json(role: &str) -> Value {
    json!({ "_id": "u1", "name": "Ada", "email": "ada@example.com", "role": role })
}

pub fn login_json(role: &str) -> Value {
    let mut user = user_json(role);
    user["token"] = json!("jwt-1");
    user
}

pub fn cart_json(quantity: i64) -> Value {
    json!({
        "items": [{
            "_id": "l1",
            "product": "p1",
            "name": "Tee",
            "price": 25,
            "quantity": quantity,
            "size": "M",
            "color": "red"
        }]
    })
}

pub fn empty_cart_json() -> Value {
    json!({ "items": [] })
}

pub fn wishlist_json(ids: &[&str]) -> Value {
    let products: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "_id": id, "name": format!("Product {id}"), "price": "10.00" }))
        .collect();
    json!({ "products": products })
}

pub fn order_json(id: &str, method: &str, paid: bool) -> Value {
    json!({
        "_id": id,
        "user": "u1",
        "orderItems": [
            { "product": "p1", "name": "Tee", "price": 25, "qty": 2, "size": "M", "color": "red" }
        ],
        "shippingAddress": {
            "fullName": "Ada Lovelace", "address": "1 Main St", "city": "Austin",
            "postalCode": "73301", "country": "US"
        },
        "paymentMethod": method,
        "itemsPrice": 50, "shippingPrice": 10, "taxPrice": 7.5, "totalPrice": 67.5,
        "isPaid": paid
    })
}

/// Register the replies a successful login triggers.
pub fn mock_login(mock: &MockTransport, role: &str) {
    mock.json(store_data::Method::Post, "/users/login", 200, login_json(role));
    mock.json(store_data::Method::Get, "/cart", 200, cart_json(2));
    mock.json(store_data::Method::Get, "/wishlist", 200, wishlist_json(&["p9"]));
}
