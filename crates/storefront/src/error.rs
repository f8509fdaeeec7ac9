//! Unified error handling for the storefront engine.
//!
//! Two broad classes matter here (and they recover differently):
//! validation errors (bad promo code, malformed email) are shown inline
//! and never fatal; backend errors during sync leave the optimistic local
//! state intact and set a recoverable error flag on the affected store.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::persistence::PersistError;
use crate::pricing::PromoRejection;

/// Engine-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Backend API operation failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// A promo code failed validation. Recoverable; shown inline.
    #[error("Promo code rejected: {0}")]
    Promo(#[from] PromoRejection),

    /// Configuration failed to load.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Local snapshot could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] PersistError),

    /// Input failed validation (e.g., malformed email).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Operation requires an authenticated session.
    #[error("Not signed in")]
    NotAuthenticated,
}

impl From<shopmint_core::EmailError> for StorefrontError {
    fn from(e: shopmint_core::EmailError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
