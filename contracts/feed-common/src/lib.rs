//! # Feed Common
//!
//! Building blocks shared by the sequencer uptime feed and the aggregator
//! proxy: error codes with their revert reasons, two-step ownership, the
//! simple read access controller and the aggregator read interface.
//!
//! Nothing in here is a contract on its own; the functions operate on the
//! storage of whichever contract calls them.

#![no_std]

pub mod access_control;
pub mod aggregator;
pub mod errors;
pub mod ownable;

pub use aggregator::{Aggregator, AggregatorClient, Round};
pub use errors::FeedError;
