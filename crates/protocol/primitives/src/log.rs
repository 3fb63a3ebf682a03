//! Contract event logs.

use alloc::vec::Vec;
use alloy_primitives::{Address, B256, Bytes};
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// The persisted form of a [`Log`]: only the consensus fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
pub struct StoredLog {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<B256>,
    /// Non-indexed data.
    pub data: Bytes,
}

/// A log together with the block and transaction context it was emitted in.
///
/// Only the consensus fields are persisted. The context fields are filled in
/// when the log is read back next to its block body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Log {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<B256>,
    /// Non-indexed data.
    pub data: Bytes,
    /// Height of the including block.
    pub block_number: u64,
    /// Hash of the emitting transaction.
    pub tx_hash: B256,
    /// Index of the emitting transaction in the block.
    pub tx_index: u64,
    /// Hash of the including block.
    pub block_hash: B256,
    /// Index of the log in the block.
    pub index: u64,
    /// Set when the log was reverted by a chain reorganisation.
    pub removed: bool,
}

impl Log {
    /// Returns the persisted form of the log.
    pub fn to_stored(&self) -> StoredLog {
        StoredLog { address: self.address, topics: self.topics.clone(), data: self.data.clone() }
    }
}

impl From<StoredLog> for Log {
    fn from(stored: StoredLog) -> Self {
        Self { address: stored.address, topics: stored.topics, data: stored.data, ..Default::default() }
    }
}
