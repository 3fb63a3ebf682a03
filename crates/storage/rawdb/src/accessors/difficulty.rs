//! Total difficulty storage.

use super::{decode_rlp, delete_or_fatal, put_or_fatal};
use crate::{
    ChainStoreReader, KeyValueWriter,
    schema::{self, FreezerTable},
    tiered::{read_live, read_tiered},
};
use alloy_primitives::{B256, U256};
use tracing::error;

/// Reads the total difficulty of blocks.
pub trait TdReader: ChainStoreReader {
    /// Returns the RLP encoded total difficulty of block `(number, hash)`.
    fn read_td_rlp(&self, hash: B256, number: u64) -> Option<Vec<u8>> {
        read_tiered(self, FreezerTable::Difficulties, number, Some(hash), || {
            read_live(self, &schema::header_td_key(number, hash))
        })
    }

    /// Returns the total difficulty of block `(number, hash)`.
    fn read_td(&self, hash: B256, number: u64) -> Option<U256> {
        let data = self.read_td_rlp(hash, number)?;
        decode_rlp("td", &data)
            .inspect_err(|err| error!(target: "rawdb", %hash, number, %err, "Invalid block total difficulty RLP"))
            .ok()
    }
}

impl<T: ChainStoreReader + ?Sized> TdReader for T {}

/// Writes the total difficulty of blocks.
pub trait TdWriter: KeyValueWriter {
    /// Stores the total difficulty of block `(number, hash)`.
    fn write_td(&self, hash: B256, number: u64, td: U256) {
        put_or_fatal(
            self,
            &schema::header_td_key(number, hash),
            &alloy_rlp::encode(td),
            "Failed to store block total difficulty",
        );
    }

    /// Removes the total difficulty of block `(number, hash)`.
    fn delete_td(&self, hash: B256, number: u64) {
        delete_or_fatal(
            self,
            &schema::header_td_key(number, hash),
            "Failed to delete block total difficulty",
        );
    }
}

impl<T: KeyValueWriter + ?Sized> TdWriter for T {}
