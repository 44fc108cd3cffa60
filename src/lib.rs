//! CallGuard - an anti-fraud call screening hook for Asterisk
//!
//! Runs as an AGI child process during call setup: outgoing calls are
//! registered with a remote verification service, incoming calls are checked
//! against it, and a call the service definitively rejects is hung up.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
