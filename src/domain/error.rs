//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the command catalog contract.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid command catalog: {message}")]
    InvalidCatalog { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
