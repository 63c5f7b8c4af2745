//! Storage keys and events for the sequencer uptime feed

use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// Reported while the sequencer is up
pub const STATUS_UP: u32 = 0;
/// Reported while the sequencer is down
pub const STATUS_DOWN: u32 = 1;

pub const DESCRIPTION: &str = "L2 Sequencer Uptime Status Feed";
pub const TYPE_AND_VERSION: &str = "SequencerUptimeFeed 1.0.0";
pub const DECIMALS: u32 = 0;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Id of the most recent round
    LatestRoundId,
    /// Round transmissions by id
    Transmission(u64),
    /// Address allowed to push status updates
    L1Sender,
}

/// Events emitted by the uptime feed
pub struct FeedEvents;

impl FeedEvents {
    pub fn new_round(env: &Env, round_id: u64, started_by: &Address, started_at: u64) {
        env.events().publish(
            (symbol_short!("new_round"), round_id),
            (started_by.clone(), started_at),
        );
    }

    pub fn answer_updated(env: &Env, status: u32, round_id: u64, updated_at: u64) {
        env.events().publish(
            (symbol_short!("ans_upd"), round_id),
            (status, updated_at),
        );
    }

    pub fn round_updated(env: &Env, status: u32, updated_at: u64) {
        env.events()
            .publish((symbol_short!("round_upd"),), (status, updated_at));
    }

    pub fn update_ignored(
        env: &Env,
        latest_status: u32,
        latest_timestamp: u64,
        incoming_status: u32,
        incoming_timestamp: u64,
    ) {
        env.events().publish(
            (symbol_short!("upd_ignrd"),),
            (
                latest_status,
                latest_timestamp,
                incoming_status,
                incoming_timestamp,
            ),
        );
    }

    pub fn l1_sender_transferred(env: &Env, from: &Option<Address>, to: &Address) {
        env.events().publish(
            (symbol_short!("l1_sender"),),
            (from.clone(), to.clone()),
        );
    }
}
