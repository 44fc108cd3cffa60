//! Client for the anti-fraud verification service
//!
//! Outgoing calls are reported to `POST /aos/saveRequest`; incoming calls
//! are checked with `POST /aos/checkRequest`, whose response body carries a
//! JSON `result` field. One request per invocation, bounded by the
//! configured timeout, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::call_info::CallInfo;

const SAVE_REQUEST_PATH: &str = "/aos/saveRequest";
const CHECK_REQUEST_PATH: &str = "/aos/checkRequest";

pub type VerificationResult<T> = std::result::Result<T, VerificationError>;

/// Failures talking to the verification service.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("verification service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("verification service answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed verification response: {0}")]
    ResponseFormat(String),
}

/// What the service concluded about a checked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The originating switch registered this call.
    Registered,
    /// The service definitively flagged the call as not registered.
    NotRegistered,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Report an outgoing call to the service.
    async fn register(&self, call: &CallInfo) -> VerificationResult<()>;

    /// Ask the service whether an incoming call was registered.
    async fn check(&self, call: &CallInfo) -> VerificationResult<Verdict>;
}

/// Response payload of `checkRequest`.
#[derive(Debug, Deserialize)]
struct CheckResponse {
    result: CheckResult,
}

/// The service has answered with both a JSON boolean and a quoted string
/// over time; accept either spelling.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CheckResult {
    Flag(bool),
    Text(String),
}

impl CheckResult {
    /// Only an explicit `false` blocks a call.
    fn is_definitely_false(&self) -> bool {
        match self {
            CheckResult::Flag(flag) => !flag,
            CheckResult::Text(text) => text.eq_ignore_ascii_case("false"),
        }
    }
}

/// HTTP implementation backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpVerificationClient {
    client: Client,
    base_url: String,
}

impl HttpVerificationClient {
    /// Build a client for `host`, with the timeout applied to each whole
    /// request including connect time.
    pub fn new(host: &str, timeout: Duration) -> VerificationResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: format!("http://{host}"),
        })
    }

    async fn post(&self, path: &str, call: &CallInfo) -> VerificationResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, %call, "posting call to verification service");
        Ok(self.client.post(&url).json(call).send().await?)
    }
}

#[async_trait]
impl VerificationApi for HttpVerificationClient {
    async fn register(&self, call: &CallInfo) -> VerificationResult<()> {
        let response = self.post(SAVE_REQUEST_PATH, call).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VerificationError::Status { status, body });
        }
        Ok(())
    }

    async fn check(&self, call: &CallInfo) -> VerificationResult<Verdict> {
        let response = self.post(CHECK_REQUEST_PATH, call).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VerificationError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: CheckResponse = serde_json::from_str(&body)
            .map_err(|err| VerificationError::ResponseFormat(format!("{err} in '{}'", body.trim())))?;

        if parsed.result.is_definitely_false() {
            Ok(Verdict::NotRegistered)
        } else {
            Ok(Verdict::Registered)
        }
    }
}
