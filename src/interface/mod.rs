//! Interface layer - External invocation surface

pub mod cli;
