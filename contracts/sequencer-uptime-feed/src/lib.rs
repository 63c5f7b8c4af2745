//! # Sequencer Uptime Feed
//!
//! Reports whether the L2 sequencer is up (`0`) or down (`1`). Status
//! changes arrive from a single trusted L1 sender and are recorded as
//! rounds; round reads are restricted by the read access controller.

#![no_std]

mod types;

#[cfg(test)]
mod test;

use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Bytes, Env, String};

use feed_common::{access_control, ownable, Aggregator, FeedError, Round};

pub use crate::types::{
    DataKey, FeedEvents, DECIMALS, DESCRIPTION, STATUS_DOWN, STATUS_UP, TYPE_AND_VERSION,
};

#[contract]
pub struct SequencerUptimeFeed;

#[contractimpl]
impl SequencerUptimeFeed {
    /// Sets the owner, enables the access check and records the first round.
    /// The owner must sign.
    pub fn initialize(env: Env, initial_status: u32, owner: Address) {
        ownable::initialize(&env, &owner);
        Self::require_valid_status(&env, initial_status);
        access_control::initialize(&env);

        let now = env.ledger().timestamp();
        Self::record_round(&env, 1, initial_status, now, &owner);
    }

    // ── Status reporting ─────────────────────────────────────────────────────

    /// Sets the address allowed to push status updates (owner only)
    pub fn set_l1_sender(env: Env, caller: Address, address: Address) {
        ownable::require_owner(&env, &caller);

        let previous: Option<Address> = env.storage().instance().get(&DataKey::L1Sender);
        if previous.as_ref() == Some(&address) {
            return;
        }
        env.storage().instance().set(&DataKey::L1Sender, &address);

        FeedEvents::l1_sender_transferred(&env, &previous, &address);
    }

    pub fn l1_sender(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::L1Sender)
    }

    /// Records a status reported by the L1 sender.
    ///
    /// Updates not newer than the latest round's `started_at` are ignored. The
    /// same status refreshes the latest round; a different status opens a
    /// new round starting at `timestamp`.
    pub fn update_status(env: Env, sender: Address, status: u32, timestamp: u64) {
        sender.require_auth();

        let l1_sender: Option<Address> = env.storage().instance().get(&DataKey::L1Sender);
        if l1_sender.as_ref() != Some(&sender) {
            panic_with_error!(&env, FeedError::NotL1Sender);
        }
        Self::require_valid_status(&env, status);

        let latest_round_id = Self::latest_round_id(&env);
        let latest = Self::transmission(&env, latest_round_id);

        if timestamp <= latest.started_at {
            FeedEvents::update_ignored(
                &env,
                latest.answer as u32,
                latest.started_at,
                status,
                timestamp,
            );
            return;
        }

        if latest.answer == status as i128 {
            Self::refresh_round(&env, latest_round_id, latest);
        } else {
            Self::record_round(&env, latest_round_id + 1, status, timestamp, &sender);
        }
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

    /// `data` is accepted for interface compatibility and ignored.
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

    fn require_valid_status(env: &Env, status: u32) {
        if status != STATUS_UP && status != STATUS_DOWN {
            panic_with_error!(env, FeedError::InvalidStatus);
        }
    }

    fn latest_round_id(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::LatestRoundId)
            .unwrap_or_else(|| panic_with_error!(env, FeedError::NotInitialized))
    }

    fn transmission(env: &Env, round_id: u64) -> Round {
        env.storage()
            .persistent()
            .get(&DataKey::Transmission(round_id))
            .unwrap_or_else(|| panic_with_error!(env, FeedError::RoundNotFound))
    }

    fn record_round(env: &Env, round_id: u64, status: u32, started_at: u64, started_by: &Address) {
        let updated_at = env.ledger().timestamp();
        let round = Round {
            round_id: round_id as u128,
            answer: status as i128,
            block_num: env.ledger().sequence(),
            started_at,
            updated_at,
        };

        env.storage()
            .persistent()
            .set(&DataKey::Transmission(round_id), &round);
        env.storage()
            .instance()
            .set(&DataKey::LatestRoundId, &round_id);

        FeedEvents::new_round(env, round_id, started_by, started_at);
        FeedEvents::answer_updated(env, status, round_id, started_at);
        FeedEvents::round_updated(env, status, updated_at);
    }

    fn refresh_round(env: &Env, round_id: u64, mut round: Round) {
        round.updated_at = env.ledger().timestamp();
        round.block_num = env.ledger().sequence();

        env.storage()
            .persistent()
            .set(&DataKey::Transmission(round_id), &round);

        FeedEvents::round_updated(env, round.answer as u32, round.updated_at);
    }
}

#[contractimpl]
impl Aggregator for SequencerUptimeFeed {
    fn latest_round_data(env: Env, caller: Address) -> Round {
        access_control::require_read_access(&env, &caller);

        let latest_round_id = Self::latest_round_id(&env);
        Self::transmission(&env, latest_round_id)
    }

    fn round_data(env: Env, caller: Address, round_id: u128) -> Round {
        access_control::require_read_access(&env, &caller);

        let latest_round_id = Self::latest_round_id(&env);
        match u64::try_from(round_id) {
            Ok(id) if id >= 1 && id <= latest_round_id => Self::transmission(&env, id),
            _ => panic_with_error!(&env, FeedError::RoundNotFound),
        }
    }

    fn description(env: Env) -> String {
        String::from_str(&env, DESCRIPTION)
    }

    fn decimals(_env: Env) -> u32 {
        DECIMALS
    }

    fn type_and_version(env: Env) -> String {
        String::from_str(&env, TYPE_AND_VERSION)
    }
}
