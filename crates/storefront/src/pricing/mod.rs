//! Pricing: promo-code validation, discount math, checkout totals.
//!
//! Everything in this module is pure: no I/O, no clock reads. Callers pass
//! the current time in, which keeps the validity-window rules testable.

pub mod promo;
pub mod totals;

pub use promo::{AppliedPromo, Discount, Promo, PromoRejection};
pub use totals::{CheckoutTotals, PricingRules};
