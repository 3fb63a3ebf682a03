//! The block header.

use alloy_primitives::{Address, B256, Bloom, Bytes, keccak256};
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// An Atlas block header.
///
/// Istanbul blocks carry no proof-of-work fields; the seal and the aggregated
/// validator signatures live inside [`Header::extra`], which is opaque to the
/// storage layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Header {
    /// Hash of the parent block.
    pub parent_hash: B256,
    /// Beneficiary of the block rewards.
    pub coinbase: Address,
    /// State root after applying the block.
    pub root: B256,
    /// Root of the transaction trie.
    pub tx_hash: B256,
    /// Root of the receipt trie.
    pub receipt_hash: B256,
    /// Bloom filter over every log emitted in the block.
    pub bloom: Bloom,
    /// Block height.
    pub number: u64,
    /// Total gas used by the block.
    pub gas_used: u64,
    /// Block timestamp in seconds.
    pub time: u64,
    /// Istanbul extra data (vanity, validator set diff, seal, aggregated seals).
    pub extra: Bytes,
}

impl Header {
    /// Computes the block hash: the keccak256 digest of the RLP encoded header.
    ///
    /// The hash is recomputed on every call, callers on a hot path should keep it around.
    pub fn hash_slow(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }
}
