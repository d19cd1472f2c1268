//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ProcessRunner, etc.)
//! but are themselves concrete structs, not traits.

mod catalog;
mod delegate;

pub use catalog::{CatalogService, BUILTIN_CATALOG};
pub use delegate::DelegationService;
