//! Domain types for the commerce backend API.
//!
//! These are the shapes the backend speaks on the wire and the shapes the
//! stores hold locally. Monetary fields are [`Money`] (decimal, serialized
//! as strings); identifiers are the typed IDs from `shopmint-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopmint_core::{
    Email, LineKey, Money, OrderId, OrderStatus, ProductId, UserId, VariantId,
};

// =============================================================================
// Catalog Types
// =============================================================================

/// A specific color/size/SKU combination of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub sku: String,
    pub color: Option<String>,
    pub size: Option<String>,
    /// Price override; falls back to the product's base price when absent.
    pub price: Option<Money>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub brand: Option<String>,
    pub price: Money,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// The fields of this product a cart line snapshots at add time.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            title: self.title.clone(),
            price: self.price,
            thumbnail: self.thumbnail.clone(),
            brand: self.brand.clone(),
        }
    }
}

/// A paginated page of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

// =============================================================================
// Cart Types
// =============================================================================

/// The slice of a product a cart line carries.
///
/// Captured when the line is created; later catalog price changes do not
/// re-price existing lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    pub thumbnail: Option<String>,
    pub brand: Option<String>,
}

/// One entry in the cart: a product (and optional variant) with a quantity
/// and a derived line total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ProductSnapshot,
    pub variant: Option<Variant>,
    pub quantity: u32,
    /// Always `quantity x unit_price()`; recomputed on every quantity change.
    pub line_total: Money,
}

impl CartLine {
    /// Build a line from a product snapshot, recomputing the total.
    #[must_use]
    pub fn new(product: ProductSnapshot, variant: Option<Variant>, quantity: u32) -> Self {
        let mut line = Self {
            product,
            variant,
            quantity,
            line_total: Money::ZERO,
        };
        line.recompute_total();
        line
    }

    /// Identity used for merging: product id plus optional variant id.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product: self.product.id,
            variant: self.variant.as_ref().map(|v| v.id),
        }
    }

    /// Effective unit price: variant override if present, else the
    /// snapshotted base price.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.variant
            .as_ref()
            .and_then(|v| v.price)
            .unwrap_or(self.product.price)
    }

    /// Restore the `line_total` invariant after a quantity change.
    pub fn recompute_total(&mut self) {
        self.line_total = (self.unit_price() * self.quantity).round_cents();
    }
}

/// The backend's authoritative view of a cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
}

/// Request body for adding an item to the backend cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItem {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

/// Request body for changing a cart line's quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItem {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

// =============================================================================
// Wishlist Types
// =============================================================================

/// The backend's authoritative view of a wishlist.
///
/// Membership is boolean per product; there is no quantity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WishlistSnapshot {
    pub items: Vec<ProductSnapshot>,
}

// =============================================================================
// Order Types
// =============================================================================

/// Priced totals for an order, as composed at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub lines: Vec<CartLine>,
    pub totals: OrderTotals,
    /// Hosted payment page for this order. Payment itself is out of our
    /// hands; the caller redirects the customer here.
    pub checkout_url: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating an order from the current cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub lines: Vec<CartLine>,
    pub promo_code: Option<String>,
    pub totals: OrderTotals,
}

// =============================================================================
// Auth Types
// =============================================================================

/// An authenticated customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Email,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: Email,
    pub password: String,
    pub name: Option<String>,
}

/// Successful login/register response: an opaque bearer token plus the
/// customer record. The token is persisted by the caller and attached to
/// subsequent requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(id: i64, cents: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Money::from_cents(cents),
            thumbnail: None,
            brand: None,
        }
    }

    #[test]
    fn test_line_total_invariant() {
        let line = CartLine::new(snapshot(1, 1250), None, 3);
        assert_eq!(line.line_total, Money::from_cents(3750));
    }

    #[test]
    fn test_variant_price_overrides_base() {
        let variant = Variant {
            id: VariantId::new(9),
            sku: "SKU-9".to_string(),
            color: Some("teal".to_string()),
            size: None,
            price: Some(Money::from_cents(1500)),
        };
        let line = CartLine::new(snapshot(1, 1250), Some(variant), 2);
        assert_eq!(line.unit_price(), Money::from_cents(1500));
        assert_eq!(line.line_total, Money::from_cents(3000));
    }

    #[test]
    fn test_key_distinguishes_variants() {
        let variant = Variant {
            id: VariantId::new(9),
            sku: "SKU-9".to_string(),
            color: None,
            size: None,
            price: None,
        };
        let plain = CartLine::new(snapshot(1, 100), None, 1);
        let with_variant = CartLine::new(snapshot(1, 100), Some(variant), 1);
        assert_ne!(plain.key(), with_variant.key());
    }

    #[test]
    fn test_cart_line_serde_roundtrip() {
        let line = CartLine::new(snapshot(7, 999), None, 2);
        let json = serde_json::to_string(&line).unwrap();
        let back: CartLine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, line);
    }
}
