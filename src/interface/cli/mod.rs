//! Command-line interface
//!
//! The dialplan invokes the hook with a positional action and the service
//! coordinates; everything else has a default.

use clap::{Parser, ValueEnum};

use crate::config::{Config, NumberingConfig, ServiceConfig};

/// Which side of the call this invocation handles.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Report an outgoing call to the verification service
    Register,
    /// Verify an incoming call and hang up when it was never registered
    Check,
}

#[derive(Parser, Debug)]
#[command(
    name = "callguard",
    about = "Asterisk AGI hook that screens calls against an anti-fraud service",
    long_about = None
)]
pub struct Cli {
    /// Whether to register an outgoing call or check an incoming one
    #[arg(value_enum)]
    pub action: Action,

    /// Host of the verification service
    #[arg(short = 'H', long)]
    pub host: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 500)]
    pub timeout: u64,

    /// Local dialing code prepended to short numbers that fail validation
    #[arg(long, default_value = "3953")]
    pub code: String,

    /// Numbering-plan region raw numbers are parsed in
    #[arg(long, default_value = "RU")]
    pub region: String,
}

impl Cli {
    /// Fold the parsed arguments into the runtime configuration.
    pub fn to_config(&self) -> Config {
        Config {
            service: ServiceConfig {
                host: self.host.clone(),
                timeout_ms: self.timeout,
            },
            numbering: NumberingConfig {
                region: self.region.clone(),
                city_code: self.code.clone(),
            },
        }
    }
}
