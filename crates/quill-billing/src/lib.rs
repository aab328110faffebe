//! Quill Billing - license synchronization for the Quill workspace
//! backend.
//!
//! Each workspace carries a locally cached license record;
//! [`LicenseService`] keeps it consistent with the external billing
//! service using a time-based freshness window, fetching over HTTP
//! only when the cache is stale or a refresh is forced. Feature
//! gating on top of the license lives in [`flags`].

pub mod client;
pub mod config;
pub mod error;
pub mod flags;
pub mod service;

pub use client::{BillingClient, HttpBillingClient, LicensePayload};
pub use config::BillingConfig;
pub use error::BillingError;
pub use flags::{FeatureFlag, FlagClient, StaticFlagClient, require_flag};
pub use service::{LicenseService, LicenseSnapshot};
