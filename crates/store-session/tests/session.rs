mod common;

use common::*;
use serde_json::json;
use store_commerce::wishlist::WishlistItem;
use store_commerce::{CartItemId, ProductId};
use store_data::{MemoryTokenStore, Method};
use store_session::{Access, SessionError};

#[tokio::test]
async fn test_login_syncs_cart_and_wishlist() {
    let (session, mock) = signed_out();
    mock_login(&mock, "client");

    let user = session.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(user.name, "Ada");
    assert!(session.auth().is_authenticated().await);
    assert!(!session.auth().is_admin().await);

    let cart = session.cart().snapshot().await;
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.subtotal().unwrap().amount_cents, 5000);
    assert!(session.wishlist().contains(&ProductId::new("p9")).await);

    let cart_fetch = &mock.requests_to(Method::Get, "/cart")[0];
    assert_eq!(cart_fetch.header("Authorization"), Some("Bearer jwt-1"));
}

#[tokio::test]
async fn test_failed_sync_still_signs_in() {
    let (session, mock) = signed_out();
    mock.json(Method::Post, "/users/login", 200, login_json("client"));
    mock.json(Method::Get, "/cart", 500, json!({ "message": "cart service down" }));
    mock.json(Method::Get, "/wishlist", 200, wishlist_json(&[]));

    session.login("ada@example.com", "secret").await.unwrap();
    assert!(session.auth().is_authenticated().await);
    assert!(session.cart().snapshot().await.is_empty());
}

#[tokio::test]
async fn test_bad_credentials_leave_state_untouched() {
    let (session, mock) = signed_out();
    mock.json(
        Method::Post,
        "/users/login",
        401,
        json!({ "message": "Invalid email or password" }),
    );

    let err = session.login("ada@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(!session.auth().is_authenticated().await);
    assert!(!session.api().client().has_token());
}

#[tokio::test]
async fn test_logout_resets_everything() {
    let (session, mock) = signed_out();
    mock_login(&mock, "client");
    session.login("ada@example.com", "secret").await.unwrap();

    session.logout().await.unwrap();

    assert!(session.auth().user().await.is_none());
    assert!(session.cart().snapshot().await.is_empty());
    assert!(session.wishlist().snapshot().await.is_empty());
    assert!(!session.api().client().has_token());

    mock.clear_requests();
    session.api().products().top().await.ok();
    let sent = &mock.requests()[0];
    assert!(sent.header("Authorization").is_none());
}

#[tokio::test]
async fn test_restore_with_rejected_token_clears_state() {
    let (session, mock) = session_with(MemoryTokenStore::with_token("stale"));
    mock.json(
        Method::Get,
        "/users/profile",
        401,
        json!({ "message": "Not authorized, token failed" }),
    );

    let restored = session.restore().await.unwrap();
    assert!(restored.is_none());
    assert!(!session.api().client().has_token());
    assert!(!session.auth().is_authenticated().await);
}

#[tokio::test]
async fn test_restore_with_valid_token() {
    let (session, mock) = session_with(MemoryTokenStore::with_token("jwt-1"));
    mock.json(Method::Get, "/users/profile", 200, user_json("admin"));
    mock.json(Method::Get, "/cart", 200, cart_json(1));
    mock.json(Method::Get, "/wishlist", 200, wishlist_json(&[]));

    let user = session.restore().await.unwrap().unwrap();
    assert!(user.is_admin());
    assert_eq!(session.cart().item_count().await, 1);
    assert!(session.require(Access::Admin).await.is_ok());
}

#[tokio::test]
async fn test_restore_without_token_makes_no_request() {
    let (session, mock) = signed_out();
    assert!(session.restore().await.unwrap().is_none());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_guards_follow_the_session() {
    let (session, mock) = signed_out();
    assert_eq!(
        session.require(Access::Authenticated).await.unwrap_err(),
        SessionError::NotAuthenticated
    );

    mock_login(&mock, "client");
    session.login("ada@example.com", "secret").await.unwrap();
    assert!(session.require(Access::Authenticated).await.is_ok());
    assert_eq!(
        session.require(Access::Admin).await.unwrap_err(),
        SessionError::Forbidden
    );
}

#[tokio::test]
async fn test_quantity_update_replaces_with_server_cart() {
    let (session, mock) = signed_out();
    mock_login(&mock, "client");
    session.login("ada@example.com", "secret").await.unwrap();

    mock.json(Method::Put, "/cart/l1", 200, cart_json(3));
    let cart = session
        .cart()
        .update_quantity(&CartItemId::new("l1"), 3)
        .await
        .unwrap();
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal().unwrap().amount_cents, 7500);

    let sent = &mock.requests_to(Method::Put, "/cart/l1")[0];
    assert_eq!(sent.body, Some(json!({ "quantity": 3 })));
}

#[tokio::test]
async fn test_rejected_quantity_update_rolls_back() {
    let (session, mock) = signed_out();
    mock_login(&mock, "client");
    session.login("ada@example.com", "secret").await.unwrap();

    mock.json(Method::Put, "/cart/l1", 400, json!({ "message": "Not enough stock" }));
    let err = session
        .cart()
        .update_quantity(&CartItemId::new("l1"), 5)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Not enough stock");
    assert_eq!(session.cart().item_count().await, 2);
}

#[tokio::test]
async fn test_zero_quantity_removes_line() {
    let (session, mock) = signed_out();
    mock_login(&mock, "client");
    session.login("ada@example.com", "secret").await.unwrap();

    mock.json(Method::Delete, "/cart/l1", 200, empty_cart_json());
    let cart = session
        .cart()
        .update_quantity(&CartItemId::new("l1"), 0)
        .await
        .unwrap();
    assert!(cart.is_empty());
    assert_eq!(mock.requests_to(Method::Delete, "/cart/l1").len(), 1);
}

#[tokio::test]
async fn test_wishlist_toggle_twice_restores_membership() {
    let (session, mock) = signed_out();
    mock_login(&mock, "client");
    session.login("ada@example.com", "secret").await.unwrap();

    mock.json(Method::Post, "/wishlist", 200, wishlist_json(&["p9", "p1"]));
    mock.json(Method::Delete, "/wishlist/p1", 200, wishlist_json(&["p9"]));

    let p1 = ProductId::new("p1");
    let before = session.wishlist().snapshot().await;

    assert!(session
        .wishlist()
        .toggle(WishlistItem::reference(p1.clone()))
        .await
        .unwrap());
    assert!(session.wishlist().contains(&p1).await);

    assert!(!session
        .wishlist()
        .toggle(WishlistItem::reference(p1.clone()))
        .await
        .unwrap());
    assert_eq!(session.wishlist().snapshot().await, before);
}

#[tokio::test]
async fn test_rejected_wishlist_toggle_rolls_back() {
    let (session, mock) = signed_out();
    mock_login(&mock, "client");
    session.login("ada@example.com", "secret").await.unwrap();

    mock.json(Method::Post, "/wishlist", 500, json!({}));
    let p1 = ProductId::new("p1");
    let err = session
        .wishlist()
        .toggle(WishlistItem::reference(p1.clone()))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), store_data::GENERIC_MESSAGE);
    assert!(!session.wishlist().contains(&p1).await);
}
