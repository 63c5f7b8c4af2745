//! Round data and the read interface every aggregator exposes.

use soroban_sdk::{contractclient, contracttype, Address, Env, String};

/// One reported round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Round {
    /// Round id; phase-encoded when read through a proxy
    pub round_id: u128,
    /// Reported answer
    pub answer: i128,
    /// Ledger sequence of the last write to this round
    pub block_num: u32,
    /// Timestamp the answer became valid at
    pub started_at: u64,
    /// Ledger timestamp of the last write to this round
    pub updated_at: u64,
}

/// Read interface of a feed aggregator.
///
/// `caller` must authorize the invocation and hold read access on the
/// aggregator.
#[contractclient(name = "AggregatorClient")]
pub trait Aggregator {
    fn latest_round_data(env: Env, caller: Address) -> Round;
    fn round_data(env: Env, caller: Address, round_id: u128) -> Round;
    fn description(env: Env) -> String;
    fn decimals(env: Env) -> u32;
    fn type_and_version(env: Env) -> String;
}
