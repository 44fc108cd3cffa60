//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Variable {0} not found in AGI environment")]
    VariableNotFound(String),

    #[error("Invalid phone number '{raw}' in variable {variable}")]
    InvalidNumber { raw: String, variable: String },

    #[error("Unknown numbering region '{0}'")]
    UnknownRegion(String),
}
