//! Simple read access controller.
//!
//! Reads are allowed for listed addresses, or for everyone while the check
//! is disabled. There is no bypass for unsigned callers: gated reads take
//! an explicit caller that has to authorize the invocation.

use soroban_sdk::{contracttype, panic_with_error, symbol_short, Address, Env};

use crate::errors::FeedError;
use crate::ownable;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessKey {
    /// Whether the access list is enforced
    CheckEnabled,
    /// Access list entry
    Access(Address),
}

/// Turns the check on for a freshly deployed contract.
pub fn initialize(env: &Env) {
    env.storage().instance().set(&AccessKey::CheckEnabled, &true);
}

pub fn check_enabled(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&AccessKey::CheckEnabled)
        .unwrap_or(true)
}

pub fn has_access(env: &Env, user: &Address) -> bool {
    if !check_enabled(env) {
        return true;
    }
    env.storage()
        .persistent()
        .get(&AccessKey::Access(user.clone()))
        .unwrap_or(false)
}

pub fn check_access(env: &Env, user: &Address) {
    if !has_access(env, user) {
        panic_with_error!(env, FeedError::NoAccess);
    }
}

/// Gate for access-controlled reads.
pub fn require_read_access(env: &Env, caller: &Address) {
    caller.require_auth();
    check_access(env, caller);
}

pub fn add_access(env: &Env, caller: &Address, user: &Address) {
    ownable::require_owner(env, caller);

    let key = AccessKey::Access(user.clone());
    if env.storage().persistent().get(&key).unwrap_or(false) {
        return;
    }
    env.storage().persistent().set(&key, &true);

    env.events().publish((symbol_short!("acc_add"),), user.clone());
}

pub fn remove_access(env: &Env, caller: &Address, user: &Address) {
    ownable::require_owner(env, caller);

    let key = AccessKey::Access(user.clone());
    if !env.storage().persistent().has(&key) {
        return;
    }
    env.storage().persistent().remove(&key);

    env.events().publish((symbol_short!("acc_rm"),), user.clone());
}

pub fn enable_access_check(env: &Env, caller: &Address) {
    ownable::require_owner(env, caller);

    if check_enabled(env) {
        return;
    }
    env.storage().instance().set(&AccessKey::CheckEnabled, &true);

    env.events().publish((symbol_short!("chk_on"),), caller.clone());
}

pub fn disable_access_check(env: &Env, caller: &Address) {
    ownable::require_owner(env, caller);

    if !check_enabled(env) {
        return;
    }
    env.storage().instance().set(&AccessKey::CheckEnabled, &false);

    env.events().publish((symbol_short!("chk_off"),), caller.clone());
}
