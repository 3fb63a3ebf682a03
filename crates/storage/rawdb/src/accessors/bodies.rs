//! Block body storage.

use super::{CanonicalReader, decode_rlp, delete_or_fatal, put_or_fatal};
use crate::{
    ChainStoreReader, KeyValueWriter,
    schema::{self, FreezerTable},
    tiered::{has_tiered, read_live, read_tiered},
};
use alloy_primitives::B256;
use atlas_primitives::Body;
use tracing::error;

/// Reads block bodies.
pub trait BodyReader: ChainStoreReader {
    /// Returns the RLP encoded body of block `(number, hash)`.
    fn read_body_rlp(&self, hash: B256, number: u64) -> Option<Vec<u8>> {
        read_tiered(self, FreezerTable::Bodies, number, Some(hash), || {
            read_live(self, &schema::block_body_key(number, hash))
        })
    }

    /// Returns the RLP encoded body of the canonical block at `number`.
    fn read_canonical_body_rlp(&self, number: u64) -> Option<Vec<u8>> {
        read_tiered(self, FreezerTable::Bodies, number, None, || {
            let hash = self.read_canonical_hash(number)?;
            read_live(self, &schema::block_body_key(number, hash))
        })
    }

    /// Returns whether the body of block `(number, hash)` is stored.
    fn has_body(&self, hash: B256, number: u64) -> bool {
        has_tiered(self, number, hash, &schema::block_body_key(number, hash))
    }

    /// Returns the decoded body of block `(number, hash)`.
    fn read_body(&self, hash: B256, number: u64) -> Option<Body> {
        let data = self.read_body_rlp(hash, number)?;
        decode_rlp("body", &data)
            .inspect_err(|err| error!(target: "rawdb", %hash, number, %err, "Invalid block body RLP"))
            .ok()
    }
}

impl<T: ChainStoreReader + ?Sized> BodyReader for T {}

/// Writes block bodies.
pub trait BodyWriter: KeyValueWriter {
    /// Stores an already encoded body of block `(number, hash)`.
    fn write_body_rlp(&self, hash: B256, number: u64, rlp: &[u8]) {
        put_or_fatal(self, &schema::block_body_key(number, hash), rlp, "Failed to store block body");
    }

    /// Stores the body of block `(number, hash)`.
    fn write_body(&self, hash: B256, number: u64, body: &Body) {
        self.write_body_rlp(hash, number, &alloy_rlp::encode(body));
    }

    /// Removes the body of block `(number, hash)`.
    fn delete_body(&self, hash: B256, number: u64) {
        delete_or_fatal(self, &schema::block_body_key(number, hash), "Failed to delete block body");
    }
}

impl<T: KeyValueWriter + ?Sized> BodyWriter for T {}
