//! Domain layer: command catalog, argv rewriting and execution requests
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalog;
pub mod entities;
pub mod error;
pub mod rewrite;

pub use catalog::{main_commands, Catalog, MAIN_COMMANDS};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use rewrite::{rewrite_args, rewrite_os_args};
