//! Error types for Quill operations.

use thiserror::Error;

/// Numeric code attached to payment-required rejections so API
/// consumers can distinguish them from plain authorization failures.
pub const PAYMENT_REQUIRED_CODE: u32 = 1999;

/// Core error type for all Quill operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Entity not found.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// The acting user is not allowed to perform the operation.
    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    /// The entity is not in a state that permits the operation.
    #[error("Precondition failed: {reason}")]
    PreconditionFailed { reason: String },

    /// The billing service failed or returned a non-success status.
    #[error("Billing service failure: {reason}")]
    Upstream { status: Option<u16>, reason: String },

    /// A paid feature was requested by a workspace that has not
    /// unlocked it.
    #[error("Payment required (code {}): feature {flag} is not enabled", PAYMENT_REQUIRED_CODE)]
    PaymentRequired { flag: String },

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
