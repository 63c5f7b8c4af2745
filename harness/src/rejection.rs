//! Rejections and the substring matching used to assert on them.

use std::fmt;

use feed_common::FeedError;
use soroban_sdk::InvokeError;

/// A refused request: the contract error if one was raised, and the reason
/// text that assertions match against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub error: Option<FeedError>,
    pub code: Option<u32>,
    pub message: String,
}

impl Rejection {
    pub fn from_contract(error: FeedError) -> Self {
        Self {
            error: Some(error),
            code: Some(error as u32),
            message: error.reason().to_string(),
        }
    }

    pub fn from_invoke(error: InvokeError) -> Self {
        match error {
            InvokeError::Contract(code) => match FeedError::from_code(code) {
                Some(known) => Self::from_contract(known),
                None => Self {
                    error: None,
                    code: Some(code),
                    message: format!("contract error #{code}"),
                },
            },
            InvokeError::Abort => Self {
                error: None,
                code: None,
                message: "aborted by the environment: missing authorization or host failure"
                    .to_string(),
            },
        }
    }

    /// True when the environment aborted the request rather than a contract
    /// refusing it.
    pub fn is_abort(&self) -> bool {
        self.code.is_none()
    }

    /// Panics unless the reason contains `expected`.
    #[track_caller]
    pub fn assert_message(&self, expected: &str) {
        assert_error_message(&self.message, expected);
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Succeeds iff `actual` contains `expected`.
#[track_caller]
pub fn assert_error_message(actual: &str, expected: &str) {
    assert!(
        actual.contains(expected),
        "expected error message containing {expected:?}, got {actual:?}"
    );
}

/// Unwraps the rejection from a result that must have been refused.
///
/// Panics if the request succeeded or failed for any other reason.
#[track_caller]
pub fn expect_rejection<T: fmt::Debug>(result: crate::Result<T>) -> Rejection {
    match result {
        Ok(value) => panic!("expected a rejection, request succeeded with {value:?}"),
        Err(crate::HarnessError::Rejected(rejection)) => rejection,
        Err(other) => panic!("expected a rejection, got {other}"),
    }
}
