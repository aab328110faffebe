//! Quill Core - shared domain layer for the Quill workspace backend.
//!
//! This crate defines the domain models (workspaces, members, pages,
//! licenses), the repository traits the storage layer implements, and
//! the error type every service speaks.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{Error, Result};
