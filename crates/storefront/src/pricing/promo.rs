//! Promo codes: eligibility rules and discount calculation.
//!
//! A [`Promo`] is validated against the cart with a fixed sequence of
//! short-circuit checks (first failure wins), then its [`Discount`] is
//! turned into a monetary amount. Each discount kind is one variant of a
//! tagged union with an exhaustive handler, so an unhandled kind is a
//! compile error rather than a silent zero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopmint_core::{Money, ProductId, PromoId, PromoStatus};
use thiserror::Error;

use crate::api::types::CartLine;

/// Why a promo code was rejected.
///
/// All of these are recoverable: the caller shows the message inline and
/// the cart is untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PromoRejection {
    #[error("this code is not active")]
    NotActive,

    #[error("this code is not valid yet")]
    NotYetValid,

    #[error("this code has expired")]
    Expired,

    #[error("this code has reached its usage limit")]
    UsageLimitReached,

    #[error("order must be at least {min} to use this code")]
    MinOrderNotMet { min: Money },

    #[error("this code does not apply to any item in your cart")]
    NotApplicable,

    #[error("this code cannot be used with the items in your cart")]
    AllItemsExcluded,
}

/// What a promo code does, as a tagged union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage off the cart subtotal, optionally capped.
    Percentage {
        percent: Decimal,
        max_discount: Option<Money>,
    },
    /// Fixed amount off, never exceeding the subtotal.
    Fixed { amount: Money },
    /// Waives the shipping fee. Carries no monetary discount against the
    /// product subtotal; the waiver is applied by the checkout composer.
    FreeShipping,
    /// Buy X get Y free. Accepted by the backend but the client-side
    /// calculation is not implemented yet; computes no discount.
    BuyXGetY { buy: u32, get: u32 },
}

impl Discount {
    /// Monetary discount against the product subtotal, rounded to cents.
    #[must_use]
    pub fn amount_against(&self, subtotal: Money) -> Money {
        match self {
            Self::Percentage {
                percent,
                max_discount,
            } => {
                let raw = subtotal * (*percent / Decimal::ONE_HUNDRED);
                let capped = match max_discount {
                    Some(cap) => raw.min(*cap),
                    None => raw,
                };
                capped.round_cents()
            }
            Self::Fixed { amount } => (*amount).min(subtotal).round_cents(),
            // Shipping waiver is handled by the totals composer.
            Self::FreeShipping => Money::ZERO,
            // Not implemented client-side; see module docs.
            Self::BuyXGetY { .. } => Money::ZERO,
        }
    }

    /// Whether this discount waives the shipping fee.
    #[must_use]
    pub const fn waives_shipping(&self) -> bool {
        matches!(self, Self::FreeShipping)
    }
}

/// A merchant-defined discount code with validity window, usage caps, and
/// eligibility rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promo {
    pub id: PromoId,
    /// Matched case-insensitively against user input.
    pub code: String,
    pub discount: Discount,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: PromoStatus,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default)]
    pub max_uses_per_user: Option<u32>,
    #[serde(default)]
    pub min_order_value: Option<Money>,
    #[serde(default)]
    pub applicable_products: Vec<ProductId>,
    #[serde(default)]
    pub excluded_products: Vec<ProductId>,
}

impl Promo {
    /// Case-insensitive code match.
    #[must_use]
    pub fn matches_code(&self, input: &str) -> bool {
        self.code.eq_ignore_ascii_case(input.trim())
    }

    /// Validate this promo against the cart. Checks run in a fixed order
    /// and the first failure wins.
    ///
    /// The excluded-products rule rejects only when *every* cart line is
    /// excluded, matching the behavior this engine replaces. A cart that
    /// mixes excluded and eligible items passes, and so does an empty
    /// cart (the vacuous "all excluded" is not treated as a rejection).
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`PromoRejection`].
    pub fn validate(
        &self,
        lines: &[CartLine],
        subtotal: Money,
        now: DateTime<Utc>,
    ) -> Result<(), PromoRejection> {
        if self.status != PromoStatus::Active {
            return Err(PromoRejection::NotActive);
        }
        if now < self.starts_at {
            return Err(PromoRejection::NotYetValid);
        }
        if now > self.ends_at {
            return Err(PromoRejection::Expired);
        }
        if let Some(max_uses) = self.max_uses
            && self.used_count >= max_uses
        {
            return Err(PromoRejection::UsageLimitReached);
        }
        if let Some(min) = self.min_order_value
            && subtotal < min
        {
            return Err(PromoRejection::MinOrderNotMet { min });
        }
        if !self.applicable_products.is_empty()
            && !lines
                .iter()
                .any(|line| self.applicable_products.contains(&line.product.id))
        {
            return Err(PromoRejection::NotApplicable);
        }
        if !self.excluded_products.is_empty()
            && !lines.is_empty()
            && lines
                .iter()
                .all(|line| self.excluded_products.contains(&line.product.id))
        {
            return Err(PromoRejection::AllItemsExcluded);
        }
        Ok(())
    }

    /// Validate and, on success, snapshot the discount for the cart as it
    /// stands now.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`PromoRejection`].
    pub fn apply(
        &self,
        lines: &[CartLine],
        subtotal: Money,
        now: DateTime<Utc>,
    ) -> Result<AppliedPromo, PromoRejection> {
        self.validate(lines, subtotal, now)?;
        Ok(AppliedPromo {
            code: self.code.clone(),
            discount: self.discount.clone(),
            amount: self.discount.amount_against(subtotal),
            applied_at: now,
        })
    }
}

/// A promo code as applied to a cart at a point in time.
///
/// `amount` is a snapshot taken at apply time. If the cart changes
/// afterwards, the discount is not recalculated until the code is
/// re-applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedPromo {
    pub code: String,
    pub discount: Discount,
    pub amount: Money,
    pub applied_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shopmint_core::ProductId;

    use crate::api::types::ProductSnapshot;

    fn line(product_id: i64, cents: i64, quantity: u32) -> CartLine {
        CartLine::new(
            ProductSnapshot {
                id: ProductId::new(product_id),
                title: format!("Product {product_id}"),
                price: Money::from_cents(cents),
                thumbnail: None,
                brand: None,
            },
            None,
            quantity,
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn promo(discount: Discount) -> Promo {
        Promo {
            id: PromoId::new(1),
            code: "SAVE10".to_string(),
            discount,
            starts_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap(),
            status: PromoStatus::Active,
            max_uses: None,
            used_count: 0,
            max_uses_per_user: None,
            min_order_value: None,
            applicable_products: Vec::new(),
            excluded_products: Vec::new(),
        }
    }

    #[test]
    fn test_percentage_discount() {
        let p = promo(Discount::Percentage {
            percent: Decimal::from(10),
            max_discount: None,
        });
        let applied = p
            .apply(&[line(1, 10000, 1)], Money::from_cents(10000), now())
            .unwrap();
        assert_eq!(applied.amount, Money::from_cents(1000));
    }

    #[test]
    fn test_percentage_discount_capped() {
        let p = promo(Discount::Percentage {
            percent: Decimal::from(50),
            max_discount: Some(Money::from_cents(500)),
        });
        let applied = p
            .apply(&[line(1, 10000, 1)], Money::from_cents(10000), now())
            .unwrap();
        assert_eq!(applied.amount, Money::from_cents(500));
    }

    #[test]
    fn test_fixed_discount_never_exceeds_subtotal() {
        let p = promo(Discount::Fixed {
            amount: Money::from_cents(2000),
        });
        let applied = p
            .apply(&[line(1, 500, 1)], Money::from_cents(500), now())
            .unwrap();
        assert_eq!(applied.amount, Money::from_cents(500));
    }

    #[test]
    fn test_free_shipping_has_no_monetary_discount() {
        let p = promo(Discount::FreeShipping);
        let applied = p
            .apply(&[line(1, 3000, 1)], Money::from_cents(3000), now())
            .unwrap();
        assert_eq!(applied.amount, Money::ZERO);
        assert!(applied.discount.waives_shipping());
    }

    #[test]
    fn test_buy_x_get_y_computes_zero() {
        let p = promo(Discount::BuyXGetY { buy: 2, get: 1 });
        let applied = p
            .apply(&[line(1, 3000, 3)], Money::from_cents(9000), now())
            .unwrap();
        assert_eq!(applied.amount, Money::ZERO);
    }

    #[test]
    fn test_inactive_rejected_first() {
        let mut p = promo(Discount::FreeShipping);
        p.status = PromoStatus::Inactive;
        // Also out of window; status check must win.
        p.ends_at = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let err = p
            .validate(&[line(1, 100, 1)], Money::from_cents(100), now())
            .unwrap_err();
        assert_eq!(err, PromoRejection::NotActive);
    }

    #[test]
    fn test_window_rejections() {
        let mut p = promo(Discount::FreeShipping);
        p.starts_at = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        let err = p
            .validate(&[line(1, 100, 1)], Money::from_cents(100), now())
            .unwrap_err();
        assert_eq!(err, PromoRejection::NotYetValid);

        let mut p = promo(Discount::FreeShipping);
        p.ends_at = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let err = p
            .validate(&[line(1, 100, 1)], Money::from_cents(100), now())
            .unwrap_err();
        assert_eq!(err, PromoRejection::Expired);
    }

    #[test]
    fn test_usage_limit() {
        let mut p = promo(Discount::FreeShipping);
        p.max_uses = Some(5);
        p.used_count = 5;
        let err = p
            .validate(&[line(1, 100, 1)], Money::from_cents(100), now())
            .unwrap_err();
        assert_eq!(err, PromoRejection::UsageLimitReached);
    }

    #[test]
    fn test_min_order_value() {
        let mut p = promo(Discount::FreeShipping);
        p.min_order_value = Some(Money::from_cents(5000));
        let err = p
            .validate(&[line(1, 100, 1)], Money::from_cents(100), now())
            .unwrap_err();
        assert_eq!(
            err,
            PromoRejection::MinOrderNotMet {
                min: Money::from_cents(5000)
            }
        );
    }

    #[test]
    fn test_applicable_products_requires_one_match() {
        let mut p = promo(Discount::FreeShipping);
        p.applicable_products = vec![ProductId::new(42)];

        let err = p
            .validate(&[line(1, 100, 1)], Money::from_cents(100), now())
            .unwrap_err();
        assert_eq!(err, PromoRejection::NotApplicable);

        let lines = [line(1, 100, 1), line(42, 100, 1)];
        assert!(p.validate(&lines, Money::from_cents(200), now()).is_ok());
    }

    #[test]
    fn test_excluded_products_rejects_only_when_all_excluded() {
        let mut p = promo(Discount::FreeShipping);
        p.excluded_products = vec![ProductId::new(1), ProductId::new(2)];

        let all_excluded = [line(1, 100, 1), line(2, 100, 1)];
        let err = p
            .validate(&all_excluded, Money::from_cents(200), now())
            .unwrap_err();
        assert_eq!(err, PromoRejection::AllItemsExcluded);

        // One eligible item is enough to pass.
        let mixed = [line(1, 100, 1), line(3, 100, 1)];
        assert!(p.validate(&mixed, Money::from_cents(200), now()).is_ok());
    }

    #[test]
    fn test_exclusions_do_not_reject_empty_cart() {
        let mut p = promo(Discount::FreeShipping);
        p.excluded_products = vec![ProductId::new(1)];

        // An empty cart has no eligible lines, but it has no excluded
        // ones either; the exclusion rule stays out of the way.
        assert!(p.validate(&[], Money::ZERO, now()).is_ok());
    }

    #[test]
    fn test_matches_code_case_insensitive() {
        let p = promo(Discount::FreeShipping);
        assert!(p.matches_code("save10"));
        assert!(p.matches_code(" SAVE10 "));
        assert!(!p.matches_code("save20"));
    }

    #[test]
    fn test_discount_serde_tag() {
        let json = serde_json::to_value(Discount::FreeShipping).unwrap();
        assert_eq!(json["type"], "free_shipping");
    }
}
