//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod orders;
pub mod shop;
pub mod wishlist;
