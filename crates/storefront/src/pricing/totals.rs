//! Checkout total composition: subtotal, discount, shipping, tax.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopmint_core::Money;

use crate::api::types::OrderTotals;
use crate::pricing::AppliedPromo;

/// Shipping and tax rules for the store's single settlement region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Money,
    /// Flat shipping fee below the threshold.
    pub flat_shipping_fee: Money,
    /// Flat tax rate as a decimal fraction (0.08 = 8%).
    pub tax_rate: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Money::from_cents(5000),
            flat_shipping_fee: Money::from_cents(999),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

/// The composed payable breakdown for a checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl CheckoutTotals {
    /// Compose the final payable amount.
    ///
    /// - The discount comes from the applied promo's snapshot.
    /// - Shipping is free at or above the threshold (checked against the
    ///   pre-discount subtotal) or when the promo waives it.
    /// - Tax applies to the post-discount amount.
    #[must_use]
    pub fn compose(subtotal: Money, promo: Option<&AppliedPromo>, rules: &PricingRules) -> Self {
        let discount = promo.map_or(Money::ZERO, |p| p.amount);
        let discounted = subtotal.saturating_sub(discount);

        let waived = promo.is_some_and(|p| p.discount.waives_shipping());
        let shipping = if waived || subtotal >= rules.free_shipping_threshold {
            Money::ZERO
        } else {
            rules.flat_shipping_fee
        };

        let tax = (discounted * rules.tax_rate).round_cents();
        let total = (discounted + shipping + tax).round_cents();

        Self {
            subtotal,
            discount,
            shipping,
            tax,
            total,
        }
    }
}

impl From<CheckoutTotals> for OrderTotals {
    fn from(t: CheckoutTotals) -> Self {
        Self {
            subtotal: t.subtotal,
            discount: t.discount,
            shipping: t.shipping,
            tax: t.tax,
            total: t.total,
        }
    }
}
