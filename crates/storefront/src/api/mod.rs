//! REST client for the commerce backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth: every cart/wishlist mutation
//!   returns the full authoritative snapshot and the stores replace their
//!   local state with it.
//! - In-memory caching via `moka` for read-mostly resources (products,
//!   active promos), 5-minute TTL. Cart and wishlist responses are never
//!   cached - they are mutable state.
//! - An opaque bearer token, when present, is attached to every request.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopmint_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config);
//!
//! let page = client.get_products(20, 0).await?;
//! let cart = client
//!     .add_to_cart(&AddCartItem {
//!         product_id: page.products[0].id,
//!         variant_id: None,
//!         quantity: 1,
//!     })
//!     .await?;
//! ```

pub mod types;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use shopmint_core::{OrderId, ProductId, PromoId, VariantId};

use crate::config::StorefrontConfig;
use crate::pricing::Promo;
use types::{
    AddCartItem, AuthResponse, CartSnapshot, LoginRequest, NewOrder, Order, Product, ProductPage,
    RegisterRequest, UpdateCartItem, User, WishlistSnapshot,
};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (network, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status with a message.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request requires authentication and none (or a stale token) was sent.
    #[error("Unauthorized")]
    Unauthorized,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Cached response values.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(ProductPage),
    Promos(Vec<Promo>),
}

/// Wire shape of a backend error body.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the commerce backend REST API.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client from configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                token: RwLock::new(config.api_token.clone()),
                cache,
            }),
        }
    }

    // =========================================================================
    // Session Token
    // =========================================================================

    /// Attach a bearer token to subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        if let Ok(mut guard) = self.inner.token.write() {
            *guard = Some(token);
        }
    }

    /// Drop the bearer token (logout).
    pub fn clear_token(&self) {
        if let Ok(mut guard) = self.inner.token.write() {
            *guard = None;
        }
    }

    /// Whether a bearer token is currently attached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.inner.token.read() {
            Ok(guard) => match guard.as_ref() {
                Some(token) => {
                    builder.header("Authorization", format!("Bearer {}", token.expose_secret()))
                }
                None => builder,
            },
            Err(_) => builder,
        }
    }

    /// Send a request and decode the JSON response.
    ///
    /// Reads the body as text first so parse failures can be logged with
    /// an excerpt of what the backend actually sent.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
                |_| body.chars().take(200).collect::<String>(),
                |e| e.message,
            );
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.inner.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.inner.client.post(self.url(path)).json(body))
            .await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.inner.client.post(self.url(path))).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.inner.client.put(self.url(path)).json(body))
            .await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.inner.client.delete(self.url(path))).await
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get a page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, limit: u64, skip: u64) -> Result<ProductPage, ApiError> {
        let cache_key = format!("products:{skip}:{limit}");

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let page: ProductPage = self
            .get(&format!("/products?limit={limit}&skip={skip}"))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get(&format!("/products/{product_id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get the authenticated user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<CartSnapshot, ApiError> {
        self.get("/cart").await
    }

    /// Add an item to the cart. Returns the full authoritative cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub async fn add_to_cart(&self, item: &AddCartItem) -> Result<CartSnapshot, ApiError> {
        self.post("/cart/items", item).await
    }

    /// Change a cart line's quantity. Returns the full authoritative cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub async fn update_cart_item(&self, item: &UpdateCartItem) -> Result<CartSnapshot, ApiError> {
        self.put("/cart/items", item).await
    }

    /// Remove a line from the cart. Returns the full authoritative cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        product_id: ProductId,
        variant_id: Option<VariantId>,
    ) -> Result<CartSnapshot, ApiError> {
        let path = match variant_id {
            Some(v) => format!("/cart/items/{product_id}?variant_id={v}"),
            None => format!("/cart/items/{product_id}"),
        };
        self.delete(&path).await
    }

    /// Empty the cart. Returns the (now empty) authoritative cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<CartSnapshot, ApiError> {
        self.delete("/cart").await
    }

    // =========================================================================
    // Wishlist Methods (not cached - mutable state)
    // =========================================================================

    /// Get the authenticated user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_wishlist(&self) -> Result<WishlistSnapshot, ApiError> {
        self.get("/wishlist").await
    }

    /// Add a product to the wishlist. Returns the full wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(
        &self,
        product_id: ProductId,
    ) -> Result<WishlistSnapshot, ApiError> {
        self.post("/wishlist/items", &serde_json::json!({ "product_id": product_id }))
            .await
    }

    /// Remove a product from the wishlist. Returns the full wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(
        &self,
        product_id: ProductId,
    ) -> Result<WishlistSnapshot, ApiError> {
        self.delete(&format!("/wishlist/items/{product_id}")).await
    }

    /// Empty the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_wishlist(&self) -> Result<WishlistSnapshot, ApiError> {
        self.delete("/wishlist").await
    }

    /// Move a wishlist product into the cart. Returns the resulting cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn move_to_cart(&self, product_id: ProductId) -> Result<CartSnapshot, ApiError> {
        self.post_empty(&format!("/wishlist/items/{product_id}/move-to-cart"))
            .await
    }

    // =========================================================================
    // Promotion Methods
    // =========================================================================

    /// Get the currently active promo codes (public).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_active_promos(&self) -> Result<Vec<Promo>, ApiError> {
        let cache_key = "promos:active".to_string();

        if let Some(CacheValue::Promos(promos)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for active promos");
            return Ok(promos);
        }

        let promos: Vec<Promo> = self.get("/promotions/active").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Promos(promos.clone()))
            .await;

        Ok(promos)
    }

    /// Create a promo code (admin). Invalidates the active-promo cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is not an admin.
    #[instrument(skip(self, promo), fields(code = %promo.code))]
    pub async fn create_promo(&self, promo: &Promo) -> Result<Promo, ApiError> {
        let created = self.post("/admin/promotions", promo).await?;
        self.invalidate_promos().await;
        Ok(created)
    }

    /// Update a promo code (admin). Invalidates the active-promo cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is not an admin.
    #[instrument(skip(self, promo), fields(promo_id = %promo_id))]
    pub async fn update_promo(&self, promo_id: PromoId, promo: &Promo) -> Result<Promo, ApiError> {
        let updated = self
            .put(&format!("/admin/promotions/{promo_id}"), promo)
            .await?;
        self.invalidate_promos().await;
        Ok(updated)
    }

    /// Delete a promo code (admin). Invalidates the active-promo cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is not an admin.
    #[instrument(skip(self), fields(promo_id = %promo_id))]
    pub async fn delete_promo(&self, promo_id: PromoId) -> Result<(), ApiError> {
        let _: serde_json::Value = self.delete(&format!("/admin/promotions/{promo_id}")).await?;
        self.invalidate_promos().await;
        Ok(())
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Create an order from the given lines and totals. The response
    /// carries the hosted payment page URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, order))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.post("/orders", order).await
    }

    /// List the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/orders").await
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, ApiError> {
        self.get(&format!("/orders/{order_id}")).await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be cancelled or the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order, ApiError> {
        self.post_empty(&format!("/orders/{order_id}/cancel")).await
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in with email and password. The token is NOT attached
    /// automatically; the caller decides whether to keep the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", request).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/register", request).await
    }

    /// Get the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or the request fails.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate the cached active-promo list.
    pub async fn invalidate_promos(&self) {
        self.inner.cache.invalidate("promos:active").await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
