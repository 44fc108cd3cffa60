//! Domain layer - Call data and numbering rules
//!
//! This layer contains:
//! - Value Objects: canonical phone numbers and the regional dial plan
//! - Entities: the call under screening
//! - Domain Errors: why a call could not be described

pub mod call_info;
pub mod phone;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};
