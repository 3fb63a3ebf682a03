//! The canonical chain index and head pointers.

use super::{delete_or_fatal, put_or_fatal};
use crate::{
    ChainStoreReader, KeyValueWriter,
    schema::{
        self, FreezerTable, HEAD_BLOCK_KEY, HEAD_FAST_BLOCK_KEY, HEAD_HEADER_KEY,
        HEADER_HASH_KEY_LENGTH, HEADER_HASH_SUFFIX, HEADER_KEY_LENGTH, HEADER_PREFIX,
    },
    tiered::{read_live, read_tiered},
};
use alloy_eips::BlockNumHash;
use alloy_primitives::B256;
use tracing::debug;

fn hash_from_slice(data: &[u8]) -> Option<B256> {
    B256::try_from(data).ok()
}

/// Reads the number↔hash indices and the head pointers.
pub trait CanonicalReader: ChainStoreReader {
    /// Returns the hash of the canonical block at `number`.
    fn read_canonical_hash(&self, number: u64) -> Option<B256> {
        let data = read_tiered(self, FreezerTable::Hashes, number, None, || {
            read_live(self, &schema::header_hash_key(number))
        })?;
        hash_from_slice(&data)
    }

    /// Returns every hash with a header stored at `number`, canonical and forked.
    ///
    /// Only the live store is scanned: frozen heights hold a single block.
    fn read_all_hashes(&self, number: u64) -> Vec<B256> {
        let prefix = schema::header_key_prefix(number);
        let iter = match self.iter(&prefix, &[]) {
            Ok(iter) => iter,
            Err(error) => {
                debug!(target: "rawdb", number, %error, "Failed to iterate headers");
                return Vec::new();
            }
        };
        iter.filter(|(key, _)| key.len() == prefix.len() + 32)
            .filter_map(|(key, _)| hash_from_slice(&key[prefix.len()..]))
            .collect()
    }

    /// Returns the number and hash of every header stored in the live store
    /// with a height in `first..=last`, in ascending height order.
    fn read_all_hashes_in_range(&self, first: u64, last: u64) -> Vec<BlockNumHash> {
        let iter = match self.iter(HEADER_PREFIX, &schema::encode_block_number(first)) {
            Ok(iter) => iter,
            Err(error) => {
                debug!(target: "rawdb", first, last, %error, "Failed to iterate headers");
                return Vec::new();
            }
        };

        let mut hashes = Vec::new();
        for (key, _) in iter {
            // Skips canonical and total difficulty entries sharing the height prefix.
            if key.len() != HEADER_KEY_LENGTH {
                continue;
            }
            let Some(number) = schema::decode_block_number(&key[HEADER_PREFIX.len()..][..8]) else {
                continue;
            };
            if number > last {
                break;
            }
            if let Some(hash) = hash_from_slice(&key[HEADER_KEY_LENGTH - 32..]) {
                hashes.push(BlockNumHash::new(number, hash));
            }
        }
        hashes
    }

    /// Returns the canonical numbers and hashes in `from..to` held by the live store.
    ///
    /// Stops once `limit` entries are collected, so a result shorter than the
    /// range means the scan paused, not that the range is exhausted.
    fn read_all_canonical_hashes(
        &self,
        from: u64,
        to: u64,
        limit: usize,
    ) -> (Vec<u64>, Vec<B256>) {
        if limit == 0 {
            return (Vec::new(), Vec::new());
        }
        let start = schema::header_hash_key(from);
        let end = schema::header_hash_key(to);
        let iter = match self.iter(HEADER_PREFIX, &start[HEADER_PREFIX.len()..]) {
            Ok(iter) => iter,
            Err(error) => {
                debug!(target: "rawdb", from, to, %error, "Failed to iterate canonical hashes");
                return (Vec::new(), Vec::new());
            }
        };

        let (mut numbers, mut hashes) = (Vec::new(), Vec::new());
        for (key, value) in iter {
            if key >= end {
                break;
            }
            if key.len() != HEADER_HASH_KEY_LENGTH || !key.ends_with(HEADER_HASH_SUFFIX) {
                continue;
            }
            let (Some(number), Some(hash)) = (
                schema::decode_block_number(&key[HEADER_PREFIX.len()..][..8]),
                hash_from_slice(&value),
            ) else {
                continue;
            };
            numbers.push(number);
            hashes.push(hash);
            if numbers.len() >= limit {
                break;
            }
        }
        (numbers, hashes)
    }

    /// Returns the number of the header with the given hash.
    fn read_header_number(&self, hash: B256) -> Option<u64> {
        read_live(self, &schema::header_number_key(hash))
            .and_then(|data| schema::decode_block_number(&data))
    }

    /// Returns the hash of the current canonical head header.
    fn read_head_header_hash(&self) -> Option<B256> {
        read_live(self, HEAD_HEADER_KEY).and_then(|data| hash_from_slice(&data))
    }

    /// Returns the hash of the current canonical head block.
    fn read_head_block_hash(&self) -> Option<B256> {
        read_live(self, HEAD_BLOCK_KEY).and_then(|data| hash_from_slice(&data))
    }

    /// Returns the hash of the current fast-sync head block.
    fn read_head_fast_block_hash(&self) -> Option<B256> {
        read_live(self, HEAD_FAST_BLOCK_KEY).and_then(|data| hash_from_slice(&data))
    }
}

impl<T: ChainStoreReader + ?Sized> CanonicalReader for T {}

/// Writes the number↔hash indices and the head pointers.
pub trait CanonicalWriter: KeyValueWriter {
    /// Marks `hash` as the canonical block at `number`.
    fn write_canonical_hash(&self, hash: B256, number: u64) {
        put_or_fatal(
            self,
            &schema::header_hash_key(number),
            hash.as_slice(),
            "Failed to store number to hash mapping",
        );
    }

    /// Removes the canonical mapping at `number`.
    fn delete_canonical_hash(&self, number: u64) {
        delete_or_fatal(
            self,
            &schema::header_hash_key(number),
            "Failed to delete number to hash mapping",
        );
    }

    /// Stores the hash→number mapping.
    fn write_header_number(&self, hash: B256, number: u64) {
        put_or_fatal(
            self,
            &schema::header_number_key(hash),
            &schema::encode_block_number(number),
            "Failed to store hash to number mapping",
        );
    }

    /// Removes the hash→number mapping.
    fn delete_header_number(&self, hash: B256) {
        delete_or_fatal(
            self,
            &schema::header_number_key(hash),
            "Failed to delete hash to number mapping",
        );
    }

    /// Stores the hash of the current canonical head header.
    fn write_head_header_hash(&self, hash: B256) {
        put_or_fatal(self, HEAD_HEADER_KEY, hash.as_slice(), "Failed to store last header's hash");
    }

    /// Stores the hash of the current canonical head block.
    fn write_head_block_hash(&self, hash: B256) {
        put_or_fatal(self, HEAD_BLOCK_KEY, hash.as_slice(), "Failed to store last block's hash");
    }

    /// Stores the hash of the current fast-sync head block.
    fn write_head_fast_block_hash(&self, hash: B256) {
        put_or_fatal(
            self,
            HEAD_FAST_BLOCK_KEY,
            hash.as_slice(),
            "Failed to store last fast block's hash",
        );
    }
}

impl<T: KeyValueWriter + ?Sized> CanonicalWriter for T {}
