//! Header storage.

use super::{CanonicalReader, CanonicalWriter, decode_rlp, delete_or_fatal, put_or_fatal};
use crate::{
    ChainStoreReader, KeyValueWriter,
    schema::{self, FreezerTable},
    tiered::{has_tiered, read_live, read_tiered},
};
use alloy_primitives::B256;
use atlas_primitives::Header;
use tracing::error;

/// Reads headers.
pub trait HeaderReader: ChainStoreReader {
    /// Returns the RLP encoded header `(number, hash)`.
    ///
    /// Frozen headers are served without checking their hash, so asking for a
    /// fork header at a frozen height yields the canonical one. Callers needing
    /// an exact match go through [`read_header`](Self::read_header) and compare
    /// hashes.
    fn read_header_rlp(&self, hash: B256, number: u64) -> Option<Vec<u8>> {
        read_tiered(self, FreezerTable::Headers, number, None, || {
            read_live(self, &schema::header_key(number, hash))
        })
    }

    /// Returns whether the header `(number, hash)` is stored.
    fn has_header(&self, hash: B256, number: u64) -> bool {
        has_tiered(self, number, hash, &schema::header_key(number, hash))
    }

    /// Returns the decoded header `(number, hash)`.
    fn read_header(&self, hash: B256, number: u64) -> Option<Header> {
        let data = self.read_header_rlp(hash, number)?;
        decode_rlp("header", &data)
            .inspect_err(|err| error!(target: "rawdb", %hash, number, %err, "Invalid block header RLP"))
            .ok()
    }

    /// Returns the header pointed to by the head header hash.
    fn read_head_header(&self) -> Option<Header> {
        let hash = self.read_head_header_hash()?;
        let number = self.read_header_number(hash)?;
        self.read_header(hash, number)
    }
}

impl<T: ChainStoreReader + ?Sized> HeaderReader for T {}

/// Writes headers together with their hash→number index entry.
pub trait HeaderWriter: KeyValueWriter {
    /// Stores `header` and its hash→number mapping.
    ///
    /// The mapping is written first, so a reader resolving the number never
    /// finds a header without it.
    fn write_header(&self, header: &Header) {
        let hash = header.hash_slow();
        let number = header.number;

        self.write_header_number(hash, number);

        let data = alloy_rlp::encode(header);
        put_or_fatal(self, &schema::header_key(number, hash), &data, "Failed to store header");
    }

    /// Removes the header `(number, hash)` and its hash→number mapping.
    fn delete_header(&self, hash: B256, number: u64) {
        self.delete_header_without_number(hash, number);
        self.delete_header_number(hash);
    }

    /// Removes the header `(number, hash)` but keeps its hash→number mapping.
    fn delete_header_without_number(&self, hash: B256, number: u64) {
        delete_or_fatal(self, &schema::header_key(number, hash), "Failed to delete header");
    }
}

impl<T: KeyValueWriter + ?Sized> HeaderWriter for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChainDb, KeyValueReader, test_utils};

    #[test]
    fn test_header_storage() {
        let db = ChainDb::in_memory();
        let header = test_utils::header(42, B256::repeat_byte(1), 0);
        let hash = header.hash_slow();

        assert!(db.read_header(hash, 42).is_none());
        assert!(!db.has_header(hash, 42));

        db.write_header(&header);
        assert_eq!(db.read_header(hash, 42), Some(header.clone()));
        assert_eq!(db.read_header_rlp(hash, 42), Some(alloy_rlp::encode(&header)));
        assert_eq!(db.read_header_number(hash), Some(42));
        assert!(db.has_header(hash, 42));

        db.delete_header(hash, 42);
        assert!(db.read_header(hash, 42).is_none());
        assert!(!db.has_header(hash, 42));
        assert_eq!(db.read_header_number(hash), None);
    }

    #[test]
    fn test_delete_header_without_number_keeps_mapping() {
        let db = ChainDb::in_memory();
        let header = test_utils::header(3, B256::ZERO, 0);
        let hash = header.hash_slow();

        db.write_header(&header);
        db.delete_header_without_number(hash, 3);

        assert!(db.read_header(hash, 3).is_none());
        assert_eq!(db.read_header_number(hash), Some(3));
    }

    #[test]
    fn test_corrupt_header_reads_as_missing() {
        let db = ChainDb::in_memory();
        let hash = B256::repeat_byte(9);
        db.live_store().put(&schema::header_key(1, hash), &[0xc3, 0x01]).unwrap();

        assert!(db.read_header_rlp(hash, 1).is_some());
        assert!(db.read_header(hash, 1).is_none());
        assert!(db.live_store().has(&schema::header_key(1, hash)).unwrap());
    }

    #[test]
    fn test_read_head_header() {
        let db = ChainDb::in_memory();
        assert!(db.read_head_header().is_none());

        let header = test_utils::header(8, B256::ZERO, 0);
        db.write_header(&header);
        db.write_head_header_hash(header.hash_slow());
        assert_eq!(db.read_head_header(), Some(header));
    }
}
