//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub numbering: NumberingConfig,
}

/// Where and how to reach the verification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub timeout_ms: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Regional dialing rules applied while normalizing raw numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberingConfig {
    pub region: String,
    pub city_code: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                host: "localhost".to_string(),
                timeout_ms: 500,
            },
            numbering: NumberingConfig {
                region: "RU".to_string(),
                city_code: "3953".to_string(),
            },
        }
    }
}
