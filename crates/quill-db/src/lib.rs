//! Quill DB - libsql-backed persistence for the Quill workspace
//! backend.
//!
//! Implements the repository traits from `quill-core` on top of a
//! local libsql (SQLite) database. Subtree-wide page transitions run
//! as single recursive-CTE statements so they are atomic without
//! row-by-row traversal.

pub mod connection;
pub mod error;
pub mod repository;
pub mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
