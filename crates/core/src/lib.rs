//! Shopmint Core - Shared types library.
//!
//! This crate provides common types used across all Shopmint components:
//! - `storefront` - The storefront engine (stores, pricing, backend client)
//! - `cli` - Command-line front end for the engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
