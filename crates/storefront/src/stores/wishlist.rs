//! The wishlist store: boolean membership per product, no pricing.
//!
//! Same dual-state pattern as the cart store, minus totals and promos.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shopmint_core::ProductId;
use tracing::{debug, instrument};

use crate::api::types::{CartSnapshot, Product, ProductSnapshot, WishlistSnapshot};
use crate::api::{ApiClient, ApiError};
use crate::notify::Notifier;
use crate::persistence::{LocalStore, keys};
use crate::stores::{SyncState, SyncTracker};

/// The slice of wishlist state that survives restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WishlistPersist {
    items: Vec<ProductSnapshot>,
}

/// Client-side wishlist with optimistic local state and backend sync.
pub struct WishlistStore {
    items: Vec<ProductSnapshot>,
    sync: SyncState,
    tracker: SyncTracker,
    client: ApiClient,
    local: LocalStore,
    notifier: Arc<dyn Notifier>,
}

impl WishlistStore {
    /// Create a wishlist store, rehydrating any persisted anonymous state.
    #[must_use]
    pub fn new(client: ApiClient, local: LocalStore, notifier: Arc<dyn Notifier>) -> Self {
        let persisted: WishlistPersist = local.load(keys::WISHLIST).unwrap_or_default();
        Self {
            items: persisted.items,
            sync: SyncState::Local,
            tracker: SyncTracker::default(),
            client,
            local,
            notifier,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Wishlist items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ProductSnapshot] {
        &self.items
    }

    /// Whether a product is on the wishlist.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Current sync state.
    #[must_use]
    pub const fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product to the wishlist. Membership is boolean: adding an
    /// already-listed product is a no-op.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_item(&mut self, product: &Product) {
        if self.contains(product.id) {
            return;
        }
        self.items.push(product.snapshot());
        self.notifier
            .success(&format!("Added {} to wishlist", product.title));

        if self.client.is_authenticated() {
            let seq = self.begin_sync();
            let result = self.client.add_to_wishlist(product.id).await;
            self.finish_sync(seq, result);
        } else {
            self.persist();
        }
    }

    /// Remove a product from the wishlist.
    #[instrument(skip(self))]
    pub async fn remove_item(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|item| item.id != product_id);
        if self.items.len() == before {
            return;
        }

        if self.client.is_authenticated() {
            let seq = self.begin_sync();
            let result = self.client.remove_from_wishlist(product_id).await;
            self.finish_sync(seq, result);
        } else {
            self.persist();
        }
    }

    /// Toggle a product's membership.
    pub async fn toggle_item(&mut self, product: &Product) {
        if self.contains(product.id) {
            self.remove_item(product.id).await;
        } else {
            self.add_item(product).await;
        }
    }

    /// Empty the wishlist.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) {
        self.items.clear();

        if self.client.is_authenticated() {
            let seq = self.begin_sync();
            let result = self.client.clear_wishlist().await;
            self.finish_sync(seq, result);
        } else {
            self.persist();
        }
    }

    /// Pull the authoritative wishlist from the backend.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        if !self.client.is_authenticated() {
            return;
        }
        let seq = self.begin_sync();
        let result = self.client.get_wishlist().await;
        self.finish_sync(seq, result);
    }

    /// Move a product from the wishlist into the cart, backend-side.
    ///
    /// Returns the resulting authoritative cart for the caller to feed
    /// into the cart store. `None` for anonymous sessions (the engine
    /// performs the move locally) or when the backend call fails (the
    /// item stays on the local wishlist).
    #[instrument(skip(self))]
    pub async fn move_to_cart(&mut self, product_id: ProductId) -> Option<CartSnapshot> {
        if !self.client.is_authenticated() {
            return None;
        }
        let seq = self.begin_sync();
        match self.client.move_to_cart(product_id).await {
            Ok(cart) => {
                if !self.tracker.is_current(seq) {
                    debug!(seq, "discarding stale move-to-cart response");
                    return None;
                }
                self.items.retain(|item| item.id != product_id);
                self.sync = SyncState::Synced;
                Some(cart)
            }
            Err(e) => {
                self.record_failure(seq, &e);
                None
            }
        }
    }

    /// Local half of an anonymous move-to-cart: drop the wishlist entry.
    pub fn remove_local(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.id != product_id);
        self.persist();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn begin_sync(&mut self) -> u64 {
        self.sync = SyncState::Syncing;
        self.tracker.begin()
    }

    fn finish_sync(&mut self, seq: u64, result: Result<WishlistSnapshot, ApiError>) {
        if !self.tracker.is_current(seq) {
            debug!(seq, "discarding stale wishlist sync response");
            return;
        }
        match result {
            Ok(snapshot) => {
                self.items = snapshot.items;
                self.sync = SyncState::Synced;
            }
            Err(e) => self.record_failure(seq, &e),
        }
    }

    fn record_failure(&mut self, _seq: u64, error: &ApiError) {
        self.sync = SyncState::Error(error.to_string());
        self.notifier
            .warn("Could not sync your wishlist - changes are saved locally");
    }

    fn persist(&self) {
        let snapshot = WishlistPersist {
            items: self.items.clone(),
        };
        if let Err(e) = self.local.save(keys::WISHLIST, &snapshot) {
            debug!(error = %e, "failed to persist wishlist snapshot");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopmint_core::Money;

    use crate::config::StorefrontConfig;
    use crate::notify::MemoryNotifier;
    use crate::pricing::PricingRules;

    fn test_store(dir: &std::path::Path) -> WishlistStore {
        let config = StorefrontConfig {
            api_url: "http://backend.invalid".to_string(),
            api_token: None,
            data_dir: dir.to_path_buf(),
            pricing: PricingRules::default(),
        };
        WishlistStore::new(
            ApiClient::new(&config),
            LocalStore::new(dir),
            Arc::new(MemoryNotifier::new()),
        )
    }

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            brand: None,
            price: Money::from_cents(1000),
            thumbnail: None,
            description: None,
            category: None,
            variants: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_membership_is_boolean() {
        let dir = tempfile::tempdir().unwrap();
        let mut wishlist = test_store(dir.path());

        let p = product(1);
        wishlist.add_item(&p).await;
        wishlist.add_item(&p).await;

        assert_eq!(wishlist.items().len(), 1);
        assert!(wishlist.contains(ProductId::new(1)));
    }

    #[tokio::test]
    async fn test_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let mut wishlist = test_store(dir.path());

        let p = product(1);
        wishlist.toggle_item(&p).await;
        assert!(wishlist.contains(p.id));
        wishlist.toggle_item(&p).await;
        assert!(!wishlist.contains(p.id));
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut wishlist = test_store(dir.path());

        wishlist.add_item(&product(1)).await;
        wishlist.add_item(&product(2)).await;
        wishlist.clear().await;

        assert!(wishlist.items().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_wishlist_rehydrates() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut wishlist = test_store(dir.path());
            wishlist.add_item(&product(7)).await;
        }

        let wishlist = test_store(dir.path());
        assert!(wishlist.contains(ProductId::new(7)));
    }

    #[tokio::test]
    async fn test_superseded_sync_response_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut wishlist = test_store(dir.path());
        wishlist.add_item(&product(1)).await;

        let stale = wishlist.begin_sync();
        let fresh = wishlist.begin_sync();

        wishlist.finish_sync(stale, Ok(WishlistSnapshot::default()));
        assert!(wishlist.contains(ProductId::new(1)));

        wishlist.finish_sync(fresh, Ok(WishlistSnapshot::default()));
        assert!(!wishlist.contains(ProductId::new(1)));
        assert_eq!(*wishlist.sync_state(), SyncState::Synced);
    }

    #[tokio::test]
    async fn test_anonymous_move_to_cart_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut wishlist = test_store(dir.path());
        wishlist.add_item(&product(1)).await;

        assert!(wishlist.move_to_cart(ProductId::new(1)).await.is_none());
        // Local removal is the engine's job for anonymous sessions.
        assert!(wishlist.contains(ProductId::new(1)));
    }
}
