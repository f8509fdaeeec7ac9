//! The [`Storefront`] facade: one object owning the client, the stores,
//! and the persisted session.

use std::sync::Arc;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use shopmint_core::{Email, OrderId};
use tracing::instrument;

use crate::api::types::{
    LoginRequest, NewOrder, Order, Product, RegisterRequest, User,
};
use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError};
use crate::notify::{Notifier, TracingNotifier};
use crate::persistence::{LocalStore, keys};
use crate::pricing::CheckoutTotals;
use crate::stores::{CartStore, WishlistStore};

/// Persisted auth session: opaque bearer token plus the customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: User,
}

/// The storefront engine: backend client, cart, wishlist, session.
///
/// All mutation goes through `&mut self`, matching the single serialized
/// action channel of the state model - there is no internal locking to
/// reason about.
pub struct Storefront {
    config: StorefrontConfig,
    client: ApiClient,
    local: LocalStore,
    user: Option<User>,
    /// The cart store; exposed directly for read access and mutations.
    pub cart: CartStore,
    /// The wishlist store; exposed directly for read access and mutations.
    pub wishlist: WishlistStore,
}

impl Storefront {
    /// Build an engine from configuration, restoring any persisted
    /// session and rehydrating anonymous store state from disk.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    /// Build an engine with an explicit notification capability.
    #[must_use]
    pub fn with_notifier(config: StorefrontConfig, notifier: Arc<dyn Notifier>) -> Self {
        let client = ApiClient::new(&config);
        let local = LocalStore::new(config.data_dir.clone());

        let user = match local.load::<StoredSession>(keys::SESSION) {
            Some(session) => {
                client.set_token(SecretString::from(session.token));
                Some(session.user)
            }
            None => None,
        };

        let cart = CartStore::new(client.clone(), local.clone(), Arc::clone(&notifier));
        let wishlist = WishlistStore::new(client.clone(), local.clone(), Arc::clone(&notifier));

        Self {
            config,
            client,
            local,
            user,
            cart,
            wishlist,
        }
    }

    /// Build an engine from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(StorefrontConfig::from_env()?))
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// The backend API client, for surfaces the engine does not wrap
    /// (catalog browsing, promo administration).
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The signed-in customer, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in, persist the session, and pull the authoritative cart and
    /// wishlist (the backend's state wins over anonymous local state).
    ///
    /// # Errors
    ///
    /// Returns an error for bad credentials or a failed request.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let email = Email::parse(email)?;
        let response = self
            .client
            .login(&LoginRequest {
                email,
                password: password.to_string(),
            })
            .await?;
        self.establish_session(response.token, response.user.clone())?;
        self.refresh_stores().await;
        Ok(response.user)
    }

    /// Register a new account and establish the session.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<User> {
        let email = Email::parse(email)?;
        let response = self
            .client
            .register(&RegisterRequest {
                email,
                password: password.to_string(),
                name,
            })
            .await?;
        self.establish_session(response.token, response.user.clone())?;
        self.refresh_stores().await;
        Ok(response.user)
    }

    /// Drop the session. The current store contents become the new
    /// anonymous local state.
    pub fn logout(&mut self) {
        self.client.clear_token();
        self.local.remove(keys::SESSION);
        self.user = None;
    }

    fn establish_session(&mut self, token: String, user: User) -> Result<()> {
        self.local.save(
            keys::SESSION,
            &StoredSession {
                token: token.clone(),
                user: user.clone(),
            },
        )?;
        self.client.set_token(SecretString::from(token));
        self.user = Some(user);
        Ok(())
    }

    /// Refresh cart and wishlist from the backend (authenticated only).
    pub async fn refresh_stores(&mut self) {
        self.cart.refresh().await;
        self.wishlist.refresh().await;
    }

    // =========================================================================
    // Cross-store Operations
    // =========================================================================

    /// Move a product from the wishlist into the cart.
    ///
    /// Authenticated sessions use the backend's move operation and adopt
    /// the cart it returns; anonymous sessions do the move locally.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn move_to_cart(&mut self, product: &Product) {
        if self.client.is_authenticated() {
            if let Some(cart) = self.wishlist.move_to_cart(product.id).await {
                self.cart.replace_from_backend(cart);
            }
        } else {
            self.wishlist.remove_local(product.id);
            self.cart.add_item(product, None, 1).await;
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// The composed totals for the current cart.
    #[must_use]
    pub fn checkout_totals(&self) -> CheckoutTotals {
        self.cart.totals(&self.config.pricing)
    }

    /// Create an order from the current cart and return it. The caller
    /// redirects the customer to `order.checkout_url` for payment; on
    /// success the local cart is emptied.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty cart, a missing session, or a failed
    /// request.
    #[instrument(skip(self))]
    pub async fn checkout(&mut self) -> Result<Order> {
        if self.cart.is_empty() {
            return Err(StorefrontError::Validation("Cart is empty".to_string()));
        }
        if !self.client.is_authenticated() {
            return Err(StorefrontError::NotAuthenticated);
        }

        let totals = self.checkout_totals();
        let order = NewOrder {
            lines: self.cart.lines().to_vec(),
            promo_code: self.cart.promo().map(|p| p.code.clone()),
            totals: totals.into(),
        };
        let placed = self.client.create_order(&order).await?;

        self.cart.clear().await;
        self.cart.remove_promo();
        Ok(placed)
    }

    /// Cancel one of the customer's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be cancelled.
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        if !self.client.is_authenticated() {
            return Err(StorefrontError::NotAuthenticated);
        }
        Ok(self.client.cancel_order(order_id).await?)
    }
}
