//! Admin promo CRUD and its effect on the active-promo cache.
//!
//! The active-promo list is cached for five minutes; every admin
//! mutation must invalidate it so shoppers see the change on the next
//! read. The `.expect(N)` counts on the GET mocks verify the re-fetch:
//! a cache hit would leave the count short and fail mock verification.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use secrecy::SecretString;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use shopmint_core::PromoId;
use shopmint_integration_tests::{TestBackend, percent_promo_json};
use shopmint_storefront::pricing::Promo;

fn promo_fixture(code: &str, percent: &str) -> Promo {
    serde_json::from_value(percent_promo_json(code, percent)).expect("promo fixture")
}

#[tokio::test]
async fn test_create_promo_invalidates_active_cache() {
    let backend = TestBackend::start().await;

    // Served twice: once before the create, once after invalidation.
    Mock::given(method("GET"))
        .and(path("/promotions/active"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([percent_promo_json("SAVE10", "10")])),
        )
        .expect(2)
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/promotions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(percent_promo_json("SAVE10", "10")))
        .expect(1)
        .mount(&backend.server)
        .await;

    let engine = backend.storefront();
    engine.client().set_token(SecretString::from("admin-tok"));

    let first = engine.client().get_active_promos().await.expect("first fetch");
    assert_eq!(first.len(), 1);

    // Cached: this read must not reach the backend.
    let cached = engine.client().get_active_promos().await.expect("cached fetch");
    assert_eq!(cached.len(), 1);

    let created = engine
        .client()
        .create_promo(&promo_fixture("SAVE10", "10"))
        .await
        .expect("create should succeed");
    assert_eq!(created.code, "SAVE10");

    // Post-invalidation read re-fetches, satisfying the expect(2).
    engine.client().get_active_promos().await.expect("refetch");
}

#[tokio::test]
async fn test_update_promo_invalidates_active_cache() {
    let backend = TestBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/promotions/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(2)
        .mount(&backend.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/admin/promotions/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(percent_promo_json("SAVE15", "15")))
        .expect(1)
        .mount(&backend.server)
        .await;

    let engine = backend.storefront();
    engine.client().set_token(SecretString::from("admin-tok"));

    engine.client().get_active_promos().await.expect("warm the cache");
    let updated = engine
        .client()
        .update_promo(PromoId::new(1), &promo_fixture("SAVE15", "15"))
        .await
        .expect("update should succeed");
    assert_eq!(updated.code, "SAVE15");
    engine.client().get_active_promos().await.expect("refetch");
}

#[tokio::test]
async fn test_delete_promo_invalidates_active_cache() {
    let backend = TestBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/promotions/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(2)
        .mount(&backend.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/promotions/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let engine = backend.storefront();
    engine.client().set_token(SecretString::from("admin-tok"));

    engine.client().get_active_promos().await.expect("warm the cache");
    engine
        .client()
        .delete_promo(PromoId::new(1))
        .await
        .expect("delete should succeed");
    engine.client().get_active_promos().await.expect("refetch");
}
