//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Administrative status of a promo code.
///
/// Distinct from the date-window check: a code can be `Active` yet still
/// outside its validity window, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromoStatus {
    /// Eligible for application (window and caps permitting).
    Active,
    /// Disabled by an admin.
    #[default]
    Inactive,
    /// Past its validity window.
    Expired,
    /// Usage caps exhausted.
    Used,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, awaiting payment on the hosted checkout page.
    #[default]
    Pending,
    /// Payment confirmed by the gateway.
    Paid,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before shipment.
    Cancelled,
}

impl OrderStatus {
    /// Whether the customer may still cancel the order.
    #[must_use]
    pub const fn cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }
}
