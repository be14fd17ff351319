//! # Permission Registry Module
//!
//! Per-model verb permissions. A request whose model has no record, or
//! whose verb is disabled on that record, is rejected before the store
//! is touched.

pub mod errors;
pub mod record;
pub mod registry;

pub use errors::{PermissionError, PermissionResult};
pub use record::{authorize, HttpVerb, PermissionRecord};
pub use registry::PermissionRegistry;
