//! Shopmint Storefront engine.
//!
//! This crate is the headless half of the storefront: it owns the
//! client-side cart and wishlist state, the promo-code pricing rules, and
//! the REST client for the commerce backend. Rendering lives elsewhere;
//! everything here is testable without a UI.
//!
//! # Architecture
//!
//! - [`api`] - REST client for the commerce backend (authoritative state)
//! - [`pricing`] - promo validation, discount math, checkout totals
//! - [`stores`] - optimistic local cart/wishlist with backend sync
//! - [`persistence`] - durable local snapshots for anonymous sessions
//! - [`engine`] - the [`Storefront`](engine::Storefront) facade tying it together
//!
//! The backend is the source of truth once a mutation round trip
//! completes: every confirmed response replaces the local line list
//! wholesale. Until then the local, optimistically updated state is what
//! the caller sees.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod pricing;
pub mod stores;

pub use engine::Storefront;
pub use error::{Result, StorefrontError};
