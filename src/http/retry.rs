//! Response classification and the refresh-once retry policy.
//!
//! Only one kind of failure is ever retried: a 401 on the first attempt of a
//! logical request, after the access token has been refreshed. Everything
//! else is surfaced to the caller immediately.

use reqwest::StatusCode;
use serde_json::Value;

use super::RawResponse;
use crate::error::{ClientError, NO_MESSAGE};

/// Which attempt of a logical request is being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    Retry,
}

impl Attempt {
    pub fn may_refresh(self) -> bool {
        matches!(self, Attempt::First)
    }
}

/// What to do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    RefreshAndRetry,
    Fail,
}

/// Any status above 200 is a failure, including 201 Created and 204 No Content.
pub fn is_failure(status: StatusCode) -> bool {
    status.as_u16() > 200
}

pub fn classify(status: StatusCode, attempt: Attempt) -> Verdict {
    if !is_failure(status) {
        Verdict::Accept
    } else if status == StatusCode::UNAUTHORIZED && attempt.may_refresh() {
        Verdict::RefreshAndRetry
    } else {
        Verdict::Fail
    }
}

/// Builds a [`ClientError::Server`] from a failed response.
///
/// The message is the body's `message` field; a missing field or a body that
/// is not JSON yields [`NO_MESSAGE`].
pub fn server_error(response: &RawResponse) -> ClientError {
    let message = response
        .json_lenient()
        .as_ref()
        .and_then(|body| body.get("message"))
        .map(|message| match message {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| NO_MESSAGE.to_string());

    ClientError::Server {
        message,
        status_code: response.status.as_u16(),
    }
}
