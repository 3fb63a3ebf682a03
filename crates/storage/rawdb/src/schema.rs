//! Database key layout.
//!
//! Numbers are encoded as 8 byte big-endian integers so that the byte order of
//! keys sharing a prefix equals the numeric order of the heights they encode.
//! The range scans in [`CanonicalReader`](crate::CanonicalReader) depend on it.
//!
//! The layout is shared with every other component reading the same database
//! and must not change.

use alloy_primitives::B256;
use derive_more::Display;

/// Tracks the hash of the latest known header.
pub const HEAD_HEADER_KEY: &[u8] = b"LastHeader";

/// Tracks the hash of the latest known full block.
pub const HEAD_BLOCK_KEY: &[u8] = b"LastBlock";

/// Tracks the hash of the latest block reached by fast sync.
pub const HEAD_FAST_BLOCK_KEY: &[u8] = b"LastFast";

/// Tracks the pivot block of the last fast sync. Absent once fully synced.
pub const LAST_PIVOT_KEY: &[u8] = b"LastPivot";

/// Tracks the number of trie entries imported during fast sync.
pub const FAST_TRIE_PROGRESS_KEY: &[u8] = b"TrieSync";

/// Tracks the oldest block whose transactions are indexed.
pub const TX_INDEX_TAIL_KEY: &[u8] = b"TransactionIndexTail";

/// Tracks the transaction lookup limit used during fast sync.
pub const FAST_TX_LOOKUP_LIMIT_KEY: &[u8] = b"FastTransactionLookupLimit";

/// Holds the bounded list of blocks that failed validation.
pub const BAD_BLOCK_KEY: &[u8] = b"InvalidBlock";

/// `h + num + hash -> header`, `h + num + hash + t -> td`, `h + num + n -> hash`.
pub const HEADER_PREFIX: &[u8] = b"h";

/// Suffix of total difficulty keys.
pub const HEADER_TD_SUFFIX: &[u8] = b"t";

/// Suffix of canonical hash keys.
pub const HEADER_HASH_SUFFIX: &[u8] = b"n";

/// `H + hash -> num`.
pub const HEADER_NUMBER_PREFIX: &[u8] = b"H";

/// `b + num + hash -> body`.
pub const BLOCK_BODY_PREFIX: &[u8] = b"b";

/// `r + num + hash -> receipts`.
pub const BLOCK_RECEIPTS_PREFIX: &[u8] = b"r";

/// `uptime + epoch -> uptime`.
pub const UPTIME_PREFIX: &[u8] = b"uptime";

/// `db-randomness-prefix + commitment -> parent hash`.
pub const RANDOMNESS_COMMITMENT_PREFIX: &[u8] = b"db-randomness-prefix";

/// Length of a header key: prefix, number and hash.
pub const HEADER_KEY_LENGTH: usize = HEADER_PREFIX.len() + 8 + 32;

/// Length of a canonical hash key: prefix, number and suffix.
pub const HEADER_HASH_KEY_LENGTH: usize = HEADER_PREFIX.len() + 8 + HEADER_HASH_SUFFIX.len();

/// The sequential tables of the ancient store, all indexed by block number.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FreezerTable {
    /// Canonical block hashes.
    #[display("hashes")]
    Hashes,
    /// RLP encoded headers.
    #[display("headers")]
    Headers,
    /// RLP encoded bodies.
    #[display("bodies")]
    Bodies,
    /// RLP encoded storage receipt lists.
    #[display("receipts")]
    Receipts,
    /// RLP encoded total difficulties.
    #[display("diffs")]
    Difficulties,
}

impl FreezerTable {
    /// Every ancient table, in the order a block is appended to them.
    pub const ALL: [Self; 5] =
        [Self::Hashes, Self::Headers, Self::Bodies, Self::Receipts, Self::Difficulties];
}

fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let mut key = Vec::with_capacity(parts.iter().map(|part| part.len()).sum());
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

/// Encodes a block number as big-endian bytes.
pub const fn encode_block_number(number: u64) -> [u8; 8] {
    number.to_be_bytes()
}

/// Decodes an 8 byte big-endian block number.
pub fn decode_block_number(bytes: &[u8]) -> Option<u64> {
    bytes.try_into().ok().map(u64::from_be_bytes)
}

/// `h + num`: the prefix shared by every header-family key at a height.
pub fn header_key_prefix(number: u64) -> Vec<u8> {
    concat(&[HEADER_PREFIX, &encode_block_number(number)])
}

/// `h + num + hash`
pub fn header_key(number: u64, hash: B256) -> Vec<u8> {
    concat(&[HEADER_PREFIX, &encode_block_number(number), hash.as_slice()])
}

/// `h + num + hash + t`
pub fn header_td_key(number: u64, hash: B256) -> Vec<u8> {
    concat(&[HEADER_PREFIX, &encode_block_number(number), hash.as_slice(), HEADER_TD_SUFFIX])
}

/// `h + num + n`
pub fn header_hash_key(number: u64) -> Vec<u8> {
    concat(&[HEADER_PREFIX, &encode_block_number(number), HEADER_HASH_SUFFIX])
}

/// `H + hash`
pub fn header_number_key(hash: B256) -> Vec<u8> {
    concat(&[HEADER_NUMBER_PREFIX, hash.as_slice()])
}

/// `b + num + hash`
pub fn block_body_key(number: u64, hash: B256) -> Vec<u8> {
    concat(&[BLOCK_BODY_PREFIX, &encode_block_number(number), hash.as_slice()])
}

/// `r + num + hash`
pub fn block_receipts_key(number: u64, hash: B256) -> Vec<u8> {
    concat(&[BLOCK_RECEIPTS_PREFIX, &encode_block_number(number), hash.as_slice()])
}

/// `uptime + epoch`
pub fn uptime_key(epoch: u64) -> Vec<u8> {
    concat(&[UPTIME_PREFIX, &encode_block_number(epoch)])
}

/// `db-randomness-prefix + commitment`
pub fn randomness_commitment_key(commitment: B256) -> Vec<u8> {
    concat(&[RANDOMNESS_COMMITMENT_PREFIX, commitment.as_slice()])
}
