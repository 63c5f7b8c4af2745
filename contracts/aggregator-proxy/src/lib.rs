//! # Aggregator Proxy
//!
//! Stable address in front of a feed aggregator. The proxy is itself
//! access controlled: every read requires the caller to hold access on the
//! proxy, and the proxy reads the aggregator as itself, so the aggregator
//! has to grant access to the proxy address.
//!
//! Aggregators are swapped in two steps (`propose_aggregator`, then
//! `confirm_aggregator`). Each confirmed aggregator starts a new phase, and
//! round ids returned by the proxy carry the phase id in their upper bits.

#![no_std]

mod types;


use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Bytes, Env, String};

use feed_common::{access_control, ownable, AggregatorClient, FeedError, Round};

pub use crate::types::{
    decode_round_id, encode_round_id, DataKey, Phase, ProxyEvents, PHASE_OFFSET,
};

#[contract]
pub struct AggregatorProxy;

#[contractimpl]
impl AggregatorProxy {
    /// Sets the owner and installs `address` as the phase 1 aggregator.
    /// The owner must sign.
    pub fn initialize(env: Env, owner: Address, address: Address) {
        ownable::initialize(&env, &owner);
        access_control::initialize(&env);

        Self::set_phase(&env, 1, &address);
    }

    // ── Reads through the current phase ──────────────────────────────────────

    pub fn latest_round_data(env: Env, caller: Address) -> Round {
        access_control::require_read_access(&env, &caller);

        let phase = Self::current_phase(&env);
        let mut round = Self::client(&env, &phase.aggregator)
            .latest_round_data(&env.current_contract_address());
        round.round_id = encode_round_id(phase.id, round.round_id);
        round
    }

    /// Reads a round by its phase-encoded id.
    pub fn round_data(env: Env, caller: Address, round_id: u128) -> Round {
        access_control::require_read_access(&env, &caller);

        let (phase_id, aggregator_round_id) = decode_round_id(round_id)
            .unwrap_or_else(|| panic_with_error!(&env, FeedError::PhaseNotFound));
        let aggregator = Self::phase_aggregator(env.clone(), phase_id);

        let mut round = Self::client(&env, &aggregator)
            .round_data(&env.current_contract_address(), &aggregator_round_id);
        round.round_id = encode_round_id(phase_id, round.round_id);
        round
    }

    pub fn description(env: Env, caller: Address) -> String {
        access_control::require_read_access(&env, &caller);

        let phase = Self::current_phase(&env);
        Self::client(&env, &phase.aggregator).description()
    }

    pub fn decimals(env: Env, caller: Address) -> u32 {
        access_control::require_read_access(&env, &caller);

        let phase = Self::current_phase(&env);
        Self::client(&env, &phase.aggregator).decimals()
    }

    pub fn type_and_version(env: Env, caller: Address) -> String {
        access_control::require_read_access(&env, &caller);

        let phase = Self::current_phase(&env);
        Self::client(&env, &phase.aggregator).type_and_version()
    }

    // ── Reads through the proposed aggregator ────────────────────────────────

    pub fn proposed_latest_round_data(env: Env, caller: Address) -> Round {
        access_control::require_read_access(&env, &caller);

        let proposed = Self::require_proposed(&env);
        Self::client(&env, &proposed).latest_round_data(&env.current_contract_address())
    }

    pub fn proposed_round_data(env: Env, caller: Address, round_id: u128) -> Round {
        access_control::require_read_access(&env, &caller);

        let proposed = Self::require_proposed(&env);
        Self::client(&env, &proposed).round_data(&env.current_contract_address(), &round_id)
    }

    // ── Aggregator management ────────────────────────────────────────────────

    pub fn propose_aggregator(env: Env, caller: Address, address: Address) {
        ownable::require_owner(&env, &caller);

        env.storage()
            .instance()
            .set(&DataKey::ProposedAggregator, &address);

        let current = Self::current_phase(&env);
        ProxyEvents::aggregator_proposed(&env, &current.aggregator, &address);
    }

    /// Promotes the proposed aggregator to a new phase. `address` must match
    /// the pending proposal.
    pub fn confirm_aggregator(env: Env, caller: Address, address: Address) {
        ownable::require_owner(&env, &caller);

        let proposed = Self::require_proposed(&env);
        if proposed != address {
            panic_with_error!(&env, FeedError::InvalidProposedAggregator);
        }

        let previous = Self::current_phase(&env);
        let phase_id = previous.id + 1;
        Self::set_phase(&env, phase_id, &address);
        env.storage().instance().remove(&DataKey::ProposedAggregator);

        ProxyEvents::aggregator_confirmed(&env, &previous.aggregator, &address, phase_id);
    }

    pub fn aggregator(env: Env) -> Address {
        Self::current_phase(&env).aggregator
    }

    pub fn phase_id(env: Env) -> u32 {
        Self::current_phase(&env).id
    }

    pub fn phase_aggregator(env: Env, phase_id: u32) -> Address {
        env.storage()
            .persistent()
            .get(&DataKey::PhaseAggregator(phase_id))
            .unwrap_or_else(|| panic_with_error!(&env, FeedError::PhaseNotFound))
    }

    pub fn proposed_aggregator(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::ProposedAggregator)
    }

    // ── Access controller ────────────────────────────────────────────────────

    pub fn add_access(env: Env, caller: Address, user: Address) {
        access_control::add_access(&env, &caller, &user);
    }

    pub fn remove_access(env: Env, caller: Address, user: Address) {
        access_control::remove_access(&env, &caller, &user);
    }

    pub fn enable_access_check(env: Env, caller: Address) {
        access_control::enable_access_check(&env, &caller);
    }

    pub fn disable_access_check(env: Env, caller: Address) {
        access_control::disable_access_check(&env, &caller);
    }

    pub fn has_access(env: Env, user: Address, _data: Bytes) -> bool {
        access_control::has_access(&env, &user)
    }

    pub fn check_access(env: Env, user: Address) {
        access_control::check_access(&env, &user);
    }

    pub fn check_enabled(env: Env) -> bool {
        access_control::check_enabled(&env)
    }

    // ── Ownership ────────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Address {
        ownable::owner(&env)
    }

    pub fn proposed_owner(env: Env) -> Option<Address> {
        ownable::proposed_owner(&env)
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) {
        ownable::transfer_ownership(&env, &caller, &new_owner);
    }

    pub fn accept_ownership(env: Env, caller: Address) {
        ownable::accept_ownership(&env, &caller);
    }

    pub fn renounce_ownership(env: Env, caller: Address) {
        ownable::renounce_ownership(&env, &caller);
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn client<'a>(env: &Env, aggregator: &Address) -> AggregatorClient<'a> {
        AggregatorClient::new(env, aggregator)
    }

    fn current_phase(env: &Env) -> Phase {
        env.storage()
            .instance()
            .get(&DataKey::CurrentPhase)
            .unwrap_or_else(|| panic_with_error!(env, FeedError::NotInitialized))
    }

    fn set_phase(env: &Env, phase_id: u32, aggregator: &Address) {
        let phase = Phase {
            id: phase_id,
            aggregator: aggregator.clone(),
        };
        env.storage().instance().set(&DataKey::CurrentPhase, &phase);
        env.storage()
            .persistent()
            .set(&DataKey::PhaseAggregator(phase_id), aggregator);
    }

    fn require_proposed(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::ProposedAggregator)
            .unwrap_or_else(|| panic_with_error!(env, FeedError::NoProposedAggregator))
    }
}
