//! Storage keys, phase encoding and events for the aggregator proxy

use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// Bits reserved for the aggregator's own round id inside a proxy round id
pub const PHASE_OFFSET: u32 = 64;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Id of the active phase
    CurrentPhase,
    /// Aggregator serving each phase
    PhaseAggregator(u32),
    /// Aggregator waiting for confirmation
    ProposedAggregator,
}

/// Active phase: an id and the aggregator behind it
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Phase {
    pub id: u32,
    pub aggregator: Address,
}

/// Packs a phase id and an aggregator round id into a proxy round id.
pub fn encode_round_id(phase_id: u32, round_id: u128) -> u128 {
    ((phase_id as u128) << PHASE_OFFSET) | (round_id & u64::MAX as u128)
}

/// Splits a proxy round id into `(phase_id, aggregator_round_id)`.
///
/// Returns `None` when the phase part does not fit a phase id.
pub fn decode_round_id(round_id: u128) -> Option<(u32, u128)> {
    let phase_id = u32::try_from(round_id >> PHASE_OFFSET).ok()?;
    Some((phase_id, round_id & u64::MAX as u128))
}

/// Events emitted by the aggregator proxy
pub struct ProxyEvents;

impl ProxyEvents {
    pub fn aggregator_proposed(env: &Env, current: &Address, proposed: &Address) {
        env.events().publish(
            (symbol_short!("agg_prop"),),
            (current.clone(), proposed.clone()),
        );
    }

    pub fn aggregator_confirmed(env: &Env, previous: &Address, latest: &Address, phase_id: u32) {
        env.events().publish(
            (symbol_short!("agg_conf"), phase_id),
            (previous.clone(), latest.clone()),
        );
    }
}
