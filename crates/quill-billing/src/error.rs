//! Billing error types.

use thiserror::Error;

use quill_core::error::Error;

/// Errors from talking to the billing service.
#[derive(Debug, Error)]
pub enum BillingError {
    /// The billing service answered with a non-success status.
    #[error("billing service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never completed (connect failure, timeout).
    #[error("billing service request failed: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("billing service response could not be decoded: {0}")]
    Decode(String),
}

impl From<BillingError> for Error {
    fn from(err: BillingError) -> Self {
        let status = match &err {
            BillingError::Status { status, .. } => Some(*status),
            _ => None,
        };
        Error::Upstream {
            status,
            reason: err.to_string(),
        }
    }
}
