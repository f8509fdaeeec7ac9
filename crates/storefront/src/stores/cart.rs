//! The cart store: line items, derived totals, applied promo.
//!
//! Totals (`total_items`, `subtotal`) are recomputed as a pure fold over
//! the lines after every mutation, so they can never drift from the line
//! list. That fold is the core invariant of this module.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopmint_core::{LineKey, Money};
use tracing::{debug, instrument};

use crate::api::types::{
    AddCartItem, CartLine, CartSnapshot, Product, UpdateCartItem, Variant,
};
use crate::api::{ApiClient, ApiError};
use crate::error::{Result, StorefrontError};
use crate::notify::Notifier;
use crate::persistence::{LocalStore, keys};
use crate::pricing::{AppliedPromo, CheckoutTotals, PricingRules};
use crate::stores::{SyncState, SyncTracker};

/// The slice of cart state that survives restarts (anonymous sessions).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CartPersist {
    lines: Vec<CartLine>,
    promo: Option<AppliedPromo>,
}

/// Client-side cart with optimistic local state and backend sync.
pub struct CartStore {
    lines: Vec<CartLine>,
    total_items: u32,
    subtotal: Money,
    promo: Option<AppliedPromo>,
    sync: SyncState,
    tracker: SyncTracker,
    client: ApiClient,
    local: LocalStore,
    notifier: Arc<dyn Notifier>,
}

impl CartStore {
    /// Create a cart store, rehydrating any persisted anonymous state.
    #[must_use]
    pub fn new(client: ApiClient, local: LocalStore, notifier: Arc<dyn Notifier>) -> Self {
        let persisted: CartPersist = local.load(keys::CART).unwrap_or_default();
        let mut store = Self {
            lines: persisted.lines,
            total_items: 0,
            subtotal: Money::ZERO,
            promo: persisted.promo,
            sync: SyncState::Local,
            tracker: SyncTracker::default(),
            client,
            local,
            notifier,
        };
        store.recompute();
        store
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of all line quantities.
    #[must_use]
    pub const fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Sum of all line totals.
    #[must_use]
    pub const fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// The promo applied to this cart, if any.
    #[must_use]
    pub const fn promo(&self) -> Option<&AppliedPromo> {
        self.promo.as_ref()
    }

    /// Current sync state.
    #[must_use]
    pub const fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    /// True when the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Compose the checkout totals for the cart as it stands.
    #[must_use]
    pub fn totals(&self, rules: &PricingRules) -> CheckoutTotals {
        CheckoutTotals::compose(self.subtotal, self.promo.as_ref(), rules)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product (optionally a specific variant) to the cart.
    ///
    /// An existing line with the same product/variant key has its quantity
    /// incremented; the unit price stays as captured at first add, even if
    /// the catalog price has changed since. Otherwise a new line is
    /// appended.
    #[instrument(skip(self, product, variant), fields(product_id = %product.id))]
    pub async fn add_item(&mut self, product: &Product, variant: Option<Variant>, quantity: u32) {
        if quantity == 0 {
            return;
        }

        let key = LineKey {
            product: product.id,
            variant: variant.as_ref().map(|v| v.id),
        };
        match self.lines.iter_mut().find(|line| line.key() == key) {
            Some(line) => {
                line.quantity += quantity;
                line.recompute_total();
            }
            None => {
                self.lines
                    .push(CartLine::new(product.snapshot(), variant, quantity));
            }
        }
        self.recompute();
        self.notifier.success(&format!("Added {} to cart", product.title));

        let item = AddCartItem {
            product_id: key.product,
            variant_id: key.variant,
            quantity,
        };
        if self.client.is_authenticated() {
            let seq = self.begin_sync();
            let result = self.client.add_to_cart(&item).await;
            self.finish_sync(seq, result);
        } else {
            self.persist();
        }
    }

    /// Set a line's quantity. Zero (or less, conceptually) removes the
    /// line - equivalent to [`remove_item`](Self::remove_item).
    #[instrument(skip(self))]
    pub async fn set_quantity(&mut self, key: LineKey, quantity: u32) {
        if quantity == 0 {
            self.remove_item(key).await;
            return;
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.key() == key) else {
            return;
        };
        line.quantity = quantity;
        line.recompute_total();
        self.recompute();

        let item = UpdateCartItem {
            product_id: key.product,
            variant_id: key.variant,
            quantity,
        };
        if self.client.is_authenticated() {
            let seq = self.begin_sync();
            let result = self.client.update_cart_item(&item).await;
            self.finish_sync(seq, result);
        } else {
            self.persist();
        }
    }

    /// Remove a line from the cart.
    #[instrument(skip(self))]
    pub async fn remove_item(&mut self, key: LineKey) {
        let before = self.lines.len();
        self.lines.retain(|line| line.key() != key);
        if self.lines.len() == before {
            return;
        }
        self.recompute();

        if self.client.is_authenticated() {
            let seq = self.begin_sync();
            let result = self
                .client
                .remove_from_cart(key.product, key.variant)
                .await;
            self.finish_sync(seq, result);
        } else {
            self.persist();
        }
    }

    /// Empty the cart. The applied promo snapshot, if any, is untouched;
    /// it stays until explicitly removed or re-applied.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) {
        self.lines.clear();
        self.recompute();

        if self.client.is_authenticated() {
            let seq = self.begin_sync();
            let result = self.client.clear_cart().await;
            self.finish_sync(seq, result);
        } else {
            self.persist();
        }
    }

    /// Pull the authoritative cart from the backend, replacing local state.
    ///
    /// Called after login so the server-side cart wins over whatever the
    /// anonymous session accumulated.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        if !self.client.is_authenticated() {
            return;
        }
        let seq = self.begin_sync();
        let result = self.client.get_cart().await;
        self.finish_sync(seq, result);
    }

    /// Replace local lines with a backend snapshot obtained out-of-band
    /// (e.g. the cart returned by a wishlist move-to-cart).
    pub fn replace_from_backend(&mut self, snapshot: CartSnapshot) {
        let seq = self.begin_sync();
        self.finish_sync(seq, Ok(snapshot));
    }

    // =========================================================================
    // Promo
    // =========================================================================

    /// Validate and apply a promo code against the current cart.
    ///
    /// The discount amount is snapshotted at apply time and not
    /// recalculated when the cart changes afterwards.
    ///
    /// # Errors
    ///
    /// Returns a recoverable error for unknown or rejected codes; the cart
    /// is untouched in that case.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn apply_promo(&mut self, code: &str, now: DateTime<Utc>) -> Result<AppliedPromo> {
        let promos = self.client.get_active_promos().await?;
        let promo = promos
            .iter()
            .find(|p| p.matches_code(code))
            .ok_or_else(|| StorefrontError::Validation(format!("Unknown promo code: {code}")))?;

        let applied = promo.apply(&self.lines, self.subtotal, now)?;
        self.notifier
            .success(&format!("Promo {} applied: -{}", applied.code, applied.amount));
        self.promo = Some(applied.clone());
        if !self.client.is_authenticated() {
            self.persist();
        }
        Ok(applied)
    }

    /// Remove the applied promo, if any.
    pub fn remove_promo(&mut self) {
        if self.promo.take().is_some() && !self.client.is_authenticated() {
            self.persist();
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Restore the derived-totals invariant: totals are a pure fold over
    /// the lines, never adjusted incrementally.
    fn recompute(&mut self) {
        self.total_items = self.lines.iter().map(|line| line.quantity).sum();
        self.subtotal = self.lines.iter().map(|line| line.line_total).sum();
    }

    fn begin_sync(&mut self) -> u64 {
        self.sync = SyncState::Syncing;
        self.tracker.begin()
    }

    /// Apply a backend response if it is still current. Success replaces
    /// the entire local line list; failure keeps local state and records
    /// the error.
    fn finish_sync(&mut self, seq: u64, result: std::result::Result<CartSnapshot, ApiError>) {
        if !self.tracker.is_current(seq) {
            debug!(seq, "discarding stale cart sync response");
            return;
        }
        match result {
            Ok(snapshot) => {
                self.lines = snapshot.lines;
                self.recompute();
                self.sync = SyncState::Synced;
            }
            Err(e) => {
                self.sync = SyncState::Error(e.to_string());
                self.notifier.warn("Could not sync your cart - changes are saved locally");
            }
        }
    }

    fn persist(&self) {
        let snapshot = CartPersist {
            lines: self.lines.clone(),
            promo: self.promo.clone(),
        };
        if let Err(e) = self.local.save(keys::CART, &snapshot) {
            debug!(error = %e, "failed to persist cart snapshot");
        }
    }
}
