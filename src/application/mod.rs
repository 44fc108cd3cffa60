//! Application layer - The screening use cases
//!
//! Glue between the AGI channel and the verification service. Registering
//! never touches the call; checking terminates it only on a definitive
//! negative verdict and lets every ambiguous outcome through.

use std::io::{self, BufRead, Write};

use tracing::{info, warn};

use crate::domain::call_info::CallInfo;
use crate::infrastructure::agi::AgiChannel;
use crate::infrastructure::verification::{Verdict, VerificationApi};

/// Report an outgoing call to the verification service.
///
/// The outcome is only ever reported on the switch console; no directive is
/// issued on this path.
pub async fn register_call<R, W, V>(
    channel: &mut AgiChannel<R, W>,
    api: &V,
    call: &CallInfo,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    V: VerificationApi,
{
    match api.register(call).await {
        Ok(()) => {
            info!(%call, "outgoing call registered");
            channel.verbose(&format!("Registered call {call}"))
        }
        Err(err) => {
            warn!(%call, error = %err, "registration failed");
            channel.verbose(&format!("Failed to register call {call}: {err}"))
        }
    }
}

/// Check an incoming call and hang up when the service says it was never
/// registered. Transport and response failures fail open: the call
/// proceeds and the failure is reported.
pub async fn check_call<R, W, V>(
    channel: &mut AgiChannel<R, W>,
    api: &V,
    call: &CallInfo,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    V: VerificationApi,
{
    match api.check(call).await {
        Ok(Verdict::NotRegistered) => {
            warn!(%call, "call not registered, terminating");
            channel.verbose(&format!("Not registered call {call}, terminating"))?;
            channel.hangup()
        }
        Ok(Verdict::Registered) => {
            info!(%call, "call verified");
            channel.verbose(&format!("Verified call {call}"))
        }
        Err(err) => {
            warn!(%call, error = %err, "verification unavailable, letting the call through");
            channel.verbose(&format!("Failed to check call {call}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::phone::DialPlan;
    use crate::infrastructure::verification::{MockVerificationApi, VerificationError};
    use reqwest::StatusCode;
    use std::io::Cursor;

    const ENVIRONMENT: &str = "agi_callerid: 79235253998\nagi_dnid: 3953123456\n\n";

    fn screened_call() -> CallInfo {
        let plan = DialPlan::from_config("RU", "3953").unwrap();
        CallInfo::new(
            plan.normalize("79235253998", "agi_callerid").unwrap(),
            plan.normalize("3953123456", "agi_dnid").unwrap(),
            None,
        )
    }

    async fn run_check(api: MockVerificationApi) -> String {
        let mut output = Vec::new();
        {
            let mut channel = AgiChannel::open(Cursor::new(ENVIRONMENT), &mut output).unwrap();
            check_call(&mut channel, &api, &screened_call()).await.unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    async fn run_register(api: MockVerificationApi) -> String {
        let mut output = Vec::new();
        {
            let mut channel = AgiChannel::open(Cursor::new(ENVIRONMENT), &mut output).unwrap();
            register_call(&mut channel, &api, &screened_call()).await.unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn unregistered_call_is_hung_up() {
        let mut api = MockVerificationApi::new();
        api.expect_check().returning(|_| Ok(Verdict::NotRegistered));

        let output = run_check(api).await;
        assert!(output.contains("Not registered call from 79235253998 to 73953123456"));
        assert!(output.contains("HANGUP"));
    }

    #[tokio::test]
    async fn verified_call_goes_through() {
        let mut api = MockVerificationApi::new();
        api.expect_check().returning(|_| Ok(Verdict::Registered));

        let output = run_check(api).await;
        assert!(output.contains("Verified call"));
        assert!(!output.contains("HANGUP"));
    }

    #[tokio::test]
    async fn verification_failure_fails_open() {
        let mut api = MockVerificationApi::new();
        api.expect_check()
            .returning(|_| Err(VerificationError::ResponseFormat("no result field".into())));

        let output = run_check(api).await;
        assert!(output.contains("Failed to check call"));
        assert!(!output.contains("HANGUP"));
    }

    #[tokio::test]
    async fn successful_registration_is_reported() {
        let mut api = MockVerificationApi::new();
        api.expect_register().returning(|_| Ok(()));

        let output = run_register(api).await;
        assert!(output.contains("Registered call from 79235253998 to 73953123456"));
        assert!(!output.contains("HANGUP"));
    }

    #[tokio::test]
    async fn failed_registration_never_terminates() {
        let mut api = MockVerificationApi::new();
        api.expect_register().returning(|_| {
            Err(VerificationError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            })
        });

        let output = run_register(api).await;
        assert!(output.contains("Failed to register call"));
        assert!(!output.contains("HANGUP"));
    }
}
