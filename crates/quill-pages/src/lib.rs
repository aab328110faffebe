//! Quill Pages - page lifecycle services for the Quill workspace
//! backend.
//!
//! The central piece is [`PageService`], which enforces the
//! owner-or-admin rule for destructive operations and drives the
//! subtree-wide archive, restore, and delete transitions.

pub mod error;
pub mod service;

pub use error::PageError;
pub use service::{CreatePageInput, PageService, UpdatePageInput};
