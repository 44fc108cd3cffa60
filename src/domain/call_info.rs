//! The call under screening
//!
//! Built exactly once per invocation from the AGI environment snapshot and
//! consumed by a single register or check request.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::domain::phone::{DialPlan, Msisdn};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;

/// Caller id of the originating party.
const VAR_CALLER_ID: &str = "agi_callerid";
/// Number the caller dialed.
const VAR_DNID: &str = "agi_dnid";
/// Redirecting number, set when the call was forwarded.
const VAR_RDNIS: &str = "agi_rdnis";

/// Sentinel Asterisk substitutes for an attribute it cannot provide.
const UNKNOWN: &str = "unknown";

/// A single call as reported by the switch, with every number already in
/// canonical form. Serializes into the verification service's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallInfo {
    #[serde(rename = "msisdnA")]
    caller: Msisdn,
    #[serde(rename = "msisdnB")]
    destination: Msisdn,
    #[serde(rename = "redirectingNumber", skip_serializing_if = "Option::is_none")]
    redirection: Option<Msisdn>,
}

impl CallInfo {
    pub fn new(caller: Msisdn, destination: Msisdn, redirection: Option<Msisdn>) -> Self {
        Self {
            caller,
            destination,
            redirection,
        }
    }

    /// Build the call from the switch's environment snapshot.
    ///
    /// Caller and destination are mandatory; the redirecting number is only
    /// present for forwarded calls. Construction is all-or-nothing: a
    /// missing mandatory variable or a number that fails normalization
    /// leaves no partially built call behind.
    pub fn from_environment(
        environment: &HashMap<String, String>,
        dial_plan: &DialPlan,
    ) -> Result<Self> {
        let caller = required(environment, VAR_CALLER_ID, dial_plan)?;
        let destination = required(environment, VAR_DNID, dial_plan)?;
        let redirection = optional(environment, VAR_RDNIS, dial_plan)?;

        Ok(Self {
            caller,
            destination,
            redirection,
        })
    }

    pub fn caller(&self) -> &Msisdn {
        &self.caller
    }

    pub fn destination(&self) -> &Msisdn {
        &self.destination
    }

    pub fn redirection(&self) -> Option<&Msisdn> {
        self.redirection.as_ref()
    }
}

impl fmt::Display for CallInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.redirection {
            Some(redirection) => write!(
                f,
                "from {} to {} over {}",
                self.caller, self.destination, redirection
            ),
            None => write!(f, "from {} to {}", self.caller, self.destination),
        }
    }
}

/// Look up a variable, treating an empty value and the `unknown` sentinel
/// exactly like a missing one.
fn lookup<'a>(environment: &'a HashMap<String, String>, variable: &str) -> Option<&'a str> {
    environment
        .get(variable)
        .map(String::as_str)
        .filter(|value| !value.is_empty() && *value != UNKNOWN)
}

fn required(
    environment: &HashMap<String, String>,
    variable: &str,
    dial_plan: &DialPlan,
) -> Result<Msisdn> {
    let raw = lookup(environment, variable)
        .ok_or_else(|| DomainError::VariableNotFound(variable.to_string()))?;
    dial_plan.normalize(raw, variable)
}

fn optional(
    environment: &HashMap<String, String>,
    variable: &str,
    dial_plan: &DialPlan,
) -> Result<Option<Msisdn>> {
    lookup(environment, variable)
        .map(|raw| dial_plan.normalize(raw, variable))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    fn plan() -> DialPlan {
        DialPlan::from_config("RU", "3953").unwrap()
    }

    #[test]
    fn builds_a_complete_call() {
        let env = environment(&[
            ("agi_callerid", "79235253998"),
            ("agi_dnid", "123456"),
            ("agi_rdnis", "+73953601331"),
        ]);

        let call = CallInfo::from_environment(&env, &plan()).unwrap();
        assert_eq!(call.caller().as_str(), "79235253998");
        assert_eq!(call.destination().as_str(), "73953123456");
        assert_eq!(call.redirection().unwrap().as_str(), "73953601331");
        assert_eq!(
            call.to_string(),
            "from 79235253998 to 73953123456 over 73953601331"
        );
    }

    #[test]
    fn unknown_sentinel_counts_as_absent() {
        let env = environment(&[
            ("agi_callerid", "79235253998"),
            ("agi_dnid", "3953123456"),
            ("agi_rdnis", "unknown"),
        ]);

        let call = CallInfo::from_environment(&env, &plan()).unwrap();
        assert_eq!(call.redirection(), None);
        assert_eq!(call.to_string(), "from 79235253998 to 73953123456");
    }

    #[test]
    fn missing_caller_is_rejected() {
        let env = environment(&[("agi_dnid", "3953123456")]);

        let err = CallInfo::from_environment(&env, &plan()).unwrap_err();
        assert_eq!(err, DomainError::VariableNotFound("agi_callerid".to_string()));
    }

    #[test]
    fn unknown_destination_is_rejected_like_a_missing_one() {
        let env = environment(&[("agi_callerid", "79235253998"), ("agi_dnid", "unknown")]);

        let err = CallInfo::from_environment(&env, &plan()).unwrap_err();
        assert_eq!(err, DomainError::VariableNotFound("agi_dnid".to_string()));
    }

    #[test]
    fn invalid_redirection_rejects_the_whole_call() {
        let env = environment(&[
            ("agi_callerid", "79235253998"),
            ("agi_dnid", "3953123456"),
            ("agi_rdnis", "99"),
        ]);

        let err = CallInfo::from_environment(&env, &plan()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidNumber { .. }));
    }

    #[test]
    fn serializes_into_the_wire_format() {
        let env = environment(&[("agi_callerid", "79235253998"), ("agi_dnid", "3953123456")]);
        let call = CallInfo::from_environment(&env, &plan()).unwrap();

        let body = serde_json::to_value(&call).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "msisdnA": "79235253998",
                "msisdnB": "73953123456",
            })
        );
    }
}
