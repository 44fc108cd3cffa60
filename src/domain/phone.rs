//! Phone number normalization
//!
//! Raw numbers arrive from the switch in whatever shape the trunk delivered
//! them: full international format, national format with a trunk prefix, or
//! a bare city number dialed without an area code. Everything that leaves
//! this module is a fully qualified number in canonical form.

use std::fmt;
use std::str::FromStr;

use phonenumber::{country, Mode, PhoneNumber};
use serde::Serialize;

use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;

/// Regional dialing rules used to parse and recover raw numbers.
///
/// The region is fixed configuration, never derived from the number itself.
#[derive(Debug, Clone)]
pub struct DialPlan {
    region: country::Id,
    city_code: String,
}

impl DialPlan {
    pub fn new(region: country::Id, city_code: impl Into<String>) -> Self {
        Self {
            region,
            city_code: city_code.into(),
        }
    }

    /// Build a dial plan from configuration strings.
    pub fn from_config(region: &str, city_code: &str) -> Result<Self> {
        let region = country::Id::from_str(region)
            .map_err(|_| DomainError::UnknownRegion(region.to_string()))?;
        Ok(Self::new(region, city_code))
    }

    /// Normalize a raw number into canonical form.
    ///
    /// The number is parsed with the default region and validated against
    /// its numbering plan. A number that fails validation is retried exactly
    /// once with the city code prepended, which recovers locally-dialed
    /// numbers missing an area code. `variable` names the AGI attribute the
    /// value came from and is only used to report failures.
    pub fn normalize(&self, raw: &str, variable: &str) -> Result<Msisdn> {
        self.parse_valid(raw)
            .or_else(|| self.parse_valid(&format!("{}{}", self.city_code, raw)))
            .map(|number| Msisdn::from_valid(&number))
            .ok_or_else(|| DomainError::InvalidNumber {
                raw: raw.to_string(),
                variable: variable.to_string(),
            })
    }

    fn parse_valid(&self, candidate: &str) -> Option<PhoneNumber> {
        let number = phonenumber::parse(Some(self.region), candidate).ok()?;
        phonenumber::is_valid(&number).then_some(number)
    }
}

/// Canonical phone number: country code plus subscriber digits, no `+` and
/// no separators. Only produced from numbers that passed numbering-plan
/// validation, and serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Msisdn(String);

impl Msisdn {
    fn from_valid(number: &PhoneNumber) -> Self {
        let e164 = number.format().mode(Mode::E164).to_string();
        Self(e164.trim_start_matches('+').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
