//! Unified error handling for the storefront state layer.
//!
//! Each subsystem has its own `thiserror` enum; this module folds them into
//! a single `StorefrontError` so embedders handle one type. Validation and
//! duplicate cases resolve locally in containers and never escalate past
//! a notice; everything else propagates here and stops.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::orders::OrderError;
use crate::services::auth::AuthError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Persisted store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Remote catalog API operation failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order operation failed.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// A form field or wizard step failed validation before any mutation.
    #[error("validation error: {0}")]
    Validation(String),
}

impl StorefrontError {
    /// Whether this error is safe to show the user verbatim.
    ///
    /// Validation, auth, and order errors carry user-facing wording; store
    /// and catalog failures get a generic message at the UI.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Auth(_) | Self::Order(_)
        )
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
