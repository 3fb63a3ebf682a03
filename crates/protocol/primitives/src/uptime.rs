//! Per-epoch validator uptime accumulators.

use alloc::vec::Vec;
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// Uptime bookkeeping for a single validator within an epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UptimeEntry {
    /// Number of lookback windows in which the validator signed at least once.
    pub score_tally: u64,
    /// Most recent block carrying the validator's signature.
    pub last_signed_block: u64,
}

/// The uptime accumulator of an epoch, indexed by validator position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Uptime {
    /// One entry per elected validator.
    pub entries: Vec<UptimeEntry>,
    /// Last block folded into the accumulator.
    pub latest_block: u64,
}
