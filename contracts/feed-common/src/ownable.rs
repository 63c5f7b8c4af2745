//! Two-step ownership.
//!
//! The owner proposes a successor with [`transfer_ownership`]; rights only
//! move once the successor calls [`accept_ownership`].

use soroban_sdk::{contracttype, panic_with_error, symbol_short, Address, Env};

use crate::errors::FeedError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OwnableKey {
    /// Current owner
    Owner,
    /// Pending owner, set by `transfer_ownership`
    ProposedOwner,
}

/// Stores the initial owner, who must sign. Fails if an owner is already set.
pub fn initialize(env: &Env, owner: &Address) {
    if env.storage().instance().has(&OwnableKey::Owner) {
        panic_with_error!(env, FeedError::AlreadyInitialized);
    }
    owner.require_auth();

    env.storage().instance().set(&OwnableKey::Owner, owner);
}

pub fn owner(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&OwnableKey::Owner)
        .unwrap_or_else(|| panic_with_error!(env, FeedError::NotInitialized))
}

pub fn proposed_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OwnableKey::ProposedOwner)
}

/// Requires `caller` to have signed and to be the current owner.
pub fn require_owner(env: &Env, caller: &Address) {
    caller.require_auth();
    if *caller != owner(env) {
        panic_with_error!(env, FeedError::NotOwner);
    }
}

pub fn transfer_ownership(env: &Env, caller: &Address, new_owner: &Address) {
    require_owner(env, caller);

    env.storage()
        .instance()
        .set(&OwnableKey::ProposedOwner, new_owner);

    env.events().publish(
        (symbol_short!("own_xfer"), caller.clone()),
        new_owner.clone(),
    );
}

pub fn accept_ownership(env: &Env, caller: &Address) {
    caller.require_auth();

    let proposed = proposed_owner(env);
    if proposed.as_ref() != Some(caller) {
        panic_with_error!(env, FeedError::NotProposedOwner);
    }

    let previous = owner(env);
    env.storage().instance().set(&OwnableKey::Owner, caller);
    env.storage().instance().remove(&OwnableKey::ProposedOwner);

    env.events()
        .publish((symbol_short!("own_accpt"), previous), caller.clone());
}

/// Hands ownership to the contract itself, which can never sign an
/// administrative call again.
pub fn renounce_ownership(env: &Env, caller: &Address) {
    require_owner(env, caller);

    let this = env.current_contract_address();
    env.storage().instance().set(&OwnableKey::Owner, &this);
    env.storage().instance().remove(&OwnableKey::ProposedOwner);

    env.events()
        .publish((symbol_short!("own_accpt"), caller.clone()), this);
}
