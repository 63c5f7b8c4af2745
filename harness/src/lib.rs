//! Test harness for the uptime feed contracts.
//!
//! Every [`Harness`] owns a fresh in-process Soroban chain, so test cases
//! never observe each other's state. Requests are either invokes, which
//! authorize exactly one signer, or calls, which name their caller
//! explicitly; there is no implicit default caller.

#![forbid(unsafe_code)]

mod config;
mod encoding;
mod error;
mod harness;
mod rejection;

pub use config::{
    HarnessConfig, NetworkConfig, PathsConfig, WalletConfig, DEFAULT_TIMEOUT_MS, DEFAULT_WALLET,
};
pub use encoding::{encode_short_string, MAX_SHORT_STRING_LEN};
pub use error::{HarnessError, Result};
pub use harness::{Caller, ConstructorArgs, Deployed, Harness, Signer, CONTRACT_NAMES};
pub use rejection::{assert_error_message, expect_rejection, Rejection};

use tracing_subscriber::EnvFilter;

/// Installs a test-friendly fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
