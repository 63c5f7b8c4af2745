//! Error types for the harness.

use std::path::PathBuf;

use thiserror::Error;

use crate::rejection::Rejection;

/// Result type alias using the harness error.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Everything a harness operation can fail with. Nothing is retried.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The chain refused to instantiate a contract.
    #[error("deployment of `{contract}` failed: {message}")]
    Deployment { contract: String, message: String },

    /// A contract or the environment refused an invoke or call.
    #[error("request rejected: {0}")]
    Rejected(Rejection),

    /// A returned value did not have the expected type.
    #[error("could not decode result as {type_name}")]
    Decode { type_name: &'static str },

    /// The suite deadline has passed.
    #[error("suite timed out after {elapsed_ms} ms (limit {limit_ms} ms)")]
    Timeout { elapsed_ms: u128, limit_ms: u64 },

    /// No wallet binding with that name.
    #[error("unknown wallet `{0}`")]
    UnknownWallet(String),

    /// Text that cannot be packed into a single 32-byte word.
    #[error("`{0}` is not a short string (at most 31 ASCII bytes)")]
    ShortString(String),

    /// Reading a configuration file or artifact failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid JSON for the schema.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// The rejection carried by this error, if it is one.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            HarnessError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}
