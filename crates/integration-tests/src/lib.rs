//! Integration tests for Shopmint.
//!
//! These tests run the full engine against a mock commerce backend
//! (`wiremock`) and a throwaway data directory, exercising the real
//! request plumbing, persistence, and sync behavior.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopmint-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_session` - login, token attachment, session restore
//! - `cart_sync` - optimistic cart mutations against the backend
//! - `wishlist_moves` - wishlist sync and move-to-cart
//! - `promo_checkout` - promo application and order placement

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::MockServer;

use shopmint_storefront::Storefront;
use shopmint_storefront::config::StorefrontConfig;
use shopmint_storefront::notify::{MemoryNotifier, Notifier};
use shopmint_storefront::pricing::PricingRules;

/// A mock commerce backend plus the local scratch state an engine needs.
///
/// Every engine built from the same harness shares the data directory, so
/// tests can restart the engine and observe what survived.
pub struct TestBackend {
    pub server: MockServer,
    pub notifier: Arc<MemoryNotifier>,
    data_dir: TempDir,
}

impl TestBackend {
    /// Start a mock backend with an empty data directory.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            notifier: Arc::new(MemoryNotifier::new()),
            data_dir: TempDir::new().expect("failed to create temp data dir"),
        }
    }

    /// Configuration pointing at the mock backend.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            api_url: self.server.uri(),
            api_token: None,
            data_dir: self.data_dir.path().to_path_buf(),
            pricing: PricingRules::default(),
        }
    }

    /// Build a fresh engine wired to this backend and the shared
    /// recording notifier.
    #[must_use]
    pub fn storefront(&self) -> Storefront {
        let notifier: Arc<dyn Notifier> = Arc::<MemoryNotifier>::clone(&self.notifier);
        Storefront::with_notifier(self.config(), notifier)
    }
}

// =============================================================================
// Wire Fixtures
// =============================================================================
//
// Monetary values are strings on the wire; keep fixture prices as string
// literals so the JSON matches what the backend would send.

/// A catalog product with no variants.
#[must_use]
pub fn product_json(id: i64, title: &str, price: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "brand": "Acme",
        "price": price,
        "thumbnail": null,
        "description": "A fine product",
        "category": "general",
        "variants": []
    })
}

/// The slice of a product a cart line carries.
#[must_use]
pub fn snapshot_json(id: i64, title: &str, price: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "thumbnail": null,
        "brand": "Acme"
    })
}

/// One cart line. `line_total` must already be `price x quantity`.
#[must_use]
pub fn line_json(snapshot: Value, quantity: u32, line_total: &str) -> Value {
    json!({
        "product": snapshot,
        "variant": null,
        "quantity": quantity,
        "line_total": line_total
    })
}

/// An authoritative cart snapshot.
#[must_use]
pub fn cart_json(lines: Vec<Value>) -> Value {
    json!({ "lines": lines })
}

/// An authoritative wishlist snapshot.
#[must_use]
pub fn wishlist_json(items: Vec<Value>) -> Value {
    json!({ "items": items })
}

/// A signed-in customer record.
#[must_use]
pub fn user_json() -> Value {
    json!({
        "id": 7,
        "email": "shopper@example.com",
        "name": "Shopper"
    })
}

/// A successful login/register response.
#[must_use]
pub fn auth_json(token: &str) -> Value {
    json!({
        "token": token,
        "user": user_json()
    })
}

/// A placed order with one line (2 x 45.00) and composed totals.
#[must_use]
pub fn order_json(id: i64, status: &str, total: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "lines": [line_json(snapshot_json(1, "Desk Lamp", "45.00"), 2, "90.00")],
        "totals": {
            "subtotal": "90.00",
            "discount": "0.00",
            "shipping": "0.00",
            "tax": "7.20",
            "total": total
        },
        "checkout_url": format!("https://pay.example.com/{id}"),
        "created_at": "2026-08-30T12:00:00Z"
    })
}

/// An active percentage promo with no caps or eligibility rules.
#[must_use]
pub fn percent_promo_json(code: &str, percent: &str) -> Value {
    json!({
        "id": 1,
        "code": code,
        "discount": { "type": "percentage", "percent": percent, "max_discount": null },
        "starts_at": "2020-01-01T00:00:00Z",
        "ends_at": "2099-01-01T00:00:00Z",
        "status": "active"
    })
}
