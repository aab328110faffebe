//! Page service error types.

use thiserror::Error;

use quill_core::error::Error;

/// Errors raised by the page service before touching storage.
#[derive(Debug, Error)]
pub enum PageError {
    /// The acting user neither owns the page nor holds an admin role.
    #[error("only the page owner or a workspace admin may {action} this page")]
    NotOwnerOrAdmin { action: &'static str },

    /// The acting user has no active membership in the workspace.
    #[error("no active membership in this workspace")]
    NotAMember,

    /// The page is locked against content edits.
    #[error("page is locked")]
    Locked,

    /// Only the owner may change a page's visibility.
    #[error("page access can only be changed by the owner")]
    AccessChangeForbidden,

    /// Deletion requires the page to be archived first.
    #[error("page must be archived before it can be deleted")]
    NotArchived,

    /// The supplied description payload was not valid base64.
    #[error("description payload is not valid base64: {0}")]
    InvalidPayload(String),
}

impl From<PageError> for Error {
    fn from(err: PageError) -> Self {
        match err {
            PageError::NotOwnerOrAdmin { .. } | PageError::NotAMember => {
                Error::AuthorizationDenied {
                    reason: err.to_string(),
                }
            }
            PageError::Locked
            | PageError::AccessChangeForbidden
            | PageError::NotArchived
            | PageError::InvalidPayload(_) => Error::PreconditionFailed {
                reason: err.to_string(),
            },
        }
    }
}
