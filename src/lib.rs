//! Cloud command proxy
//!
//! Exposes the Platform.sh CLI commands under a parent CLI: each command is
//! renamed, its arguments rewritten, and the call handed to the platform
//! binary, which is installed on first use.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
