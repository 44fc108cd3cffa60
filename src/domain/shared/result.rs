//! Domain result type

use super::error::DomainError;

/// Result type shared by call extraction and number normalization
pub type Result<T> = std::result::Result<T, DomainError>;
