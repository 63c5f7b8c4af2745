//! Error codes shared by every feed contract.
//!
//! Each code carries a fixed reason string. Off-chain tooling matches
//! rejections against these strings, so changing one is a breaking change.

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FeedError {
    /// `initialize` was called on an initialized contract
    AlreadyInitialized = 1,
    /// Contract storage has not been initialized yet
    NotInitialized = 2,
    /// Caller is not the current owner
    NotOwner = 3,
    /// Caller is not the pending owner
    NotProposedOwner = 4,
    /// Address is not on the access list and the check is enabled
    NoAccess = 5,
    /// Status other than 0 (up) or 1 (down)
    InvalidStatus = 6,
    /// Status update not coming from the configured L1 sender
    NotL1Sender = 7,
    /// Round id out of range
    RoundNotFound = 8,
    /// Proxy has no pending aggregator
    NoProposedAggregator = 9,
    /// Confirmed aggregator differs from the pending one
    InvalidProposedAggregator = 10,
    /// Proxy phase id was never assigned
    PhaseNotFound = 11,
}

impl FeedError {
    /// Human readable revert reason.
    pub const fn reason(&self) -> &'static str {
        match self {
            FeedError::AlreadyInitialized => "Initializable: contract already initialized",
            FeedError::NotInitialized => "Initializable: contract not initialized",
            FeedError::NotOwner => "Ownable: caller is not the owner",
            FeedError::NotProposedOwner => "Ownable: caller is not the proposed owner",
            FeedError::NoAccess => "AccessController: address does not have access",
            FeedError::InvalidStatus => "SequencerUptimeFeed: status must be 0 or 1",
            FeedError::NotL1Sender => "SequencerUptimeFeed: EXPECTED_FROM_BRIDGE_ONLY",
            FeedError::RoundNotFound => "SequencerUptimeFeed: invalid round",
            FeedError::NoProposedAggregator => "AggregatorProxy: no proposed aggregator",
            FeedError::InvalidProposedAggregator => "AggregatorProxy: invalid proposed aggregator",
            FeedError::PhaseNotFound => "AggregatorProxy: phase does not exist",
        }
    }

    /// Maps a raw contract error code back to its variant.
    pub const fn from_code(code: u32) -> Option<FeedError> {
        match code {
            1 => Some(FeedError::AlreadyInitialized),
            2 => Some(FeedError::NotInitialized),
            3 => Some(FeedError::NotOwner),
            4 => Some(FeedError::NotProposedOwner),
            5 => Some(FeedError::NoAccess),
            6 => Some(FeedError::InvalidStatus),
            7 => Some(FeedError::NotL1Sender),
            8 => Some(FeedError::RoundNotFound),
            9 => Some(FeedError::NoProposedAggregator),
            10 => Some(FeedError::InvalidProposedAggregator),
            11 => Some(FeedError::PhaseNotFound),
            _ => None,
        }
    }
}
