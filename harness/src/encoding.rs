//! Numeric encoding of short strings.
//!
//! A short string is packed big-endian into a single 256-bit word, the way
//! feed descriptions are compared numerically by off-chain tooling.

use soroban_sdk::{Bytes, Env, U256};

use crate::error::{HarnessError, Result};

/// Longest string that fits a word with the top byte left clear.
pub const MAX_SHORT_STRING_LEN: usize = 31;

pub fn encode_short_string(env: &Env, text: &str) -> Result<U256> {
    if text.len() > MAX_SHORT_STRING_LEN || !text.is_ascii() {
        return Err(HarnessError::ShortString(text.to_string()));
    }

    let mut word = [0u8; 32];
    word[32 - text.len()..].copy_from_slice(text.as_bytes());

    Ok(U256::from_be_bytes(env, &Bytes::from_array(env, &word)))
}
