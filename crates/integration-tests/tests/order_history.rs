//! Order history: list, detail, and cancellation.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use secrecy::SecretString;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use shopmint_core::{Money, OrderId, OrderStatus};
use shopmint_integration_tests::{TestBackend, order_json};
use shopmint_storefront::StorefrontError;
use shopmint_storefront::api::ApiError;

#[tokio::test]
async fn test_list_and_get_orders() {
    let backend = TestBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            order_json(501, "pending", "97.20"),
            order_json(502, "shipped", "97.20"),
        ])))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/501"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json(501, "pending", "97.20")))
        .expect(1)
        .mount(&backend.server)
        .await;

    let engine = backend.storefront();
    engine.client().set_token(SecretString::from("tok"));

    let orders = engine.client().list_my_orders().await.expect("list orders");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert_eq!(orders[1].status, OrderStatus::Shipped);

    let order = engine
        .client()
        .get_order(OrderId::new(501))
        .await
        .expect("get order");
    assert_eq!(order.id, OrderId::new(501));
    assert_eq!(order.totals.total, Money::from_cents(9720));
    assert_eq!(order.checkout_url, "https://pay.example.com/501");
}

#[tokio::test]
async fn test_cancel_pending_order() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/orders/501/cancel"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(order_json(501, "cancelled", "97.20")),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let engine = backend.storefront();
    engine.client().set_token(SecretString::from("tok"));

    let cancelled = engine
        .cancel_order(OrderId::new(501))
        .await
        .expect("cancel should succeed");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(!cancelled.status.cancellable());
}

#[tokio::test]
async fn test_cancel_shipped_order_surfaces_backend_rejection() {
    let backend = TestBackend::start().await;

    // The backend owns the cancellability rule; a shipped order comes
    // back as a conflict and the error is surfaced, not swallowed.
    Mock::given(method("POST"))
        .and(path("/orders/502/cancel"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(serde_json::json!({ "message": "order already shipped" })),
        )
        .expect(1)
        .mount(&backend.server)
        .await;

    let engine = backend.storefront();
    engine.client().set_token(SecretString::from("tok"));

    let result = engine.cancel_order(OrderId::new(502)).await;
    match result {
        Err(StorefrontError::Api(ApiError::Status { status, message })) => {
            assert_eq!(status, 409);
            assert_eq!(message, "order already shipped");
        }
        other => panic!("expected a backend conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancel_requires_auth() {
    let backend = TestBackend::start().await;

    let engine = backend.storefront();
    let result = engine.cancel_order(OrderId::new(501)).await;
    assert!(matches!(result, Err(StorefrontError::NotAuthenticated)));
}
