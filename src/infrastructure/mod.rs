//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - The AGI channel the switch drives us over
//! - The HTTP client for the verification service

pub mod agi;
pub mod verification;
