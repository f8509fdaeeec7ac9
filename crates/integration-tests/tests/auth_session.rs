//! Login, bearer-token attachment, and session restore.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use shopmint_integration_tests::{TestBackend, auth_json, cart_json, wishlist_json};
use shopmint_storefront::stores::SyncState;

/// Mount the store endpoints login's refresh hits, requiring the token.
async fn mount_authed_stores(backend: &TestBackend, token: &str) {
    let bearer = format!("Bearer {token}");
    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("Authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(vec![])))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wishlist"))
        .and(header("Authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(wishlist_json(vec![])))
        .mount(&backend.server)
        .await;
}

#[tokio::test]
async fn test_login_attaches_bearer_token() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("tok-123")))
        .expect(1)
        .mount(&backend.server)
        .await;
    mount_authed_stores(&backend, "tok-123").await;

    let mut engine = backend.storefront();
    let user = engine
        .login("shopper@example.com", "hunter2")
        .await
        .expect("login should succeed");

    assert_eq!(user.email.as_str(), "shopper@example.com");
    assert!(engine.client().is_authenticated());

    // The refresh only succeeds if the token matched the header mocks,
    // and the backend's (empty) stores win over local state.
    assert_eq!(*engine.cart.sync_state(), SyncState::Synced);
    assert_eq!(*engine.wishlist.sync_state(), SyncState::Synced);
}

#[tokio::test]
async fn test_login_replaces_anonymous_cart_with_backend_cart() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("tok-123")))
        .mount(&backend.server)
        .await;
    mount_authed_stores(&backend, "tok-123").await;

    let mut engine = backend.storefront();

    // Build up an anonymous cart first.
    let product = serde_json::from_value(shopmint_integration_tests::product_json(
        9,
        "Umbrella",
        "12.00",
    ))
    .expect("product fixture");
    engine.cart.add_item(&product, None, 4).await;
    assert_eq!(engine.cart.total_items(), 4);

    engine
        .login("shopper@example.com", "hunter2")
        .await
        .expect("login should succeed");

    // The server-side cart (empty) is authoritative after login.
    assert!(engine.cart.is_empty());
}

#[tokio::test]
async fn test_session_restored_from_disk() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("tok-456")))
        .mount(&backend.server)
        .await;
    mount_authed_stores(&backend, "tok-456").await;

    {
        let mut engine = backend.storefront();
        engine
            .login("shopper@example.com", "hunter2")
            .await
            .expect("login should succeed");
    }

    // A fresh engine over the same data directory picks the session up.
    let engine = backend.storefront();
    assert!(engine.client().is_authenticated());
    assert_eq!(
        engine.current_user().map(|u| u.email.as_str()),
        Some("shopper@example.com")
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("tok-789")))
        .mount(&backend.server)
        .await;
    mount_authed_stores(&backend, "tok-789").await;

    let mut engine = backend.storefront();
    engine
        .login("shopper@example.com", "hunter2")
        .await
        .expect("login should succeed");
    engine.logout();

    assert!(!engine.client().is_authenticated());
    assert!(engine.current_user().is_none());

    // And the persisted session is gone for the next engine too.
    let restarted = backend.storefront();
    assert!(!restarted.client().is_authenticated());
}
