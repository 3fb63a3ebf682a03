//! The chain database handle.

use crate::{
    AncientReader, AncientWriteOp, AncientWriter, DatabaseError, KeyValueIter, KeyValueIterator,
    KeyValueReader, KeyValueWriter,
    memory::{MemoryAncients, MemoryDb},
    metrics::Metrics,
    schema::FreezerTable,
};

/// Pairs a live key/value store with an ancient store.
///
/// Every accessor trait of this crate is available on a `ChainDb`. Reads
/// resolve across both tiers. Writes land in the live store, apart from
/// [`write_ancient_blocks`](crate::AncientBlockWriter::write_ancient_blocks).
#[derive(Debug, Default)]
pub struct ChainDb<KV, A> {
    live: KV,
    ancients: A,
}

impl<KV, A> ChainDb<KV, A> {
    /// Creates a handle over the given live and ancient stores.
    pub const fn new(live: KV, ancients: A) -> Self {
        Self { live, ancients }
    }

    /// Describes and zeroes the storage metrics.
    pub fn with_metrics(self) -> Self {
        Metrics::init();
        self
    }

    /// Returns the live store.
    pub const fn live_store(&self) -> &KV {
        &self.live
    }

    /// Returns the ancient store.
    pub const fn ancient_store(&self) -> &A {
        &self.ancients
    }

    /// Consumes the handle, returning the live and ancient stores.
    pub fn into_parts(self) -> (KV, A) {
        (self.live, self.ancients)
    }
}

impl ChainDb<MemoryDb, MemoryAncients> {
    /// Creates a handle over empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::default()
    }
}

impl<KV: KeyValueReader, A> KeyValueReader for ChainDb<KV, A> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, DatabaseError> {
        self.live.get(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool, DatabaseError> {
        self.live.has(key)
    }
}

impl<KV: KeyValueWriter, A> KeyValueWriter for ChainDb<KV, A> {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError> {
        self.live.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), DatabaseError> {
        self.live.delete(key)
    }
}

impl<KV: KeyValueIterator, A> KeyValueIterator for ChainDb<KV, A> {
    fn iter(&self, prefix: &[u8], start: &[u8]) -> Result<KeyValueIter<'_>, DatabaseError> {
        self.live.iter(prefix, start)
    }
}

impl<KV, A: AncientReader> AncientReader for ChainDb<KV, A> {
    fn ancient(&self, table: FreezerTable, number: u64) -> Result<Option<Vec<u8>>, DatabaseError> {
        self.ancients.ancient(table, number)
    }

    fn has_ancient(&self, table: FreezerTable, number: u64) -> Result<bool, DatabaseError> {
        self.ancients.has_ancient(table, number)
    }

    fn ancients(&self) -> Result<u64, DatabaseError> {
        self.ancients.ancients()
    }
}

impl<KV, A: AncientWriter> AncientWriter for ChainDb<KV, A> {
    fn modify_ancients<F>(&self, f: F) -> Result<u64, DatabaseError>
    where
        F: FnOnce(&mut dyn AncientWriteOp) -> Result<(), DatabaseError>,
    {
        self.ancients.modify_ancients(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AncientBlockWriter, BlockReader, BlockWriter, CanonicalReader, CanonicalWriter,
        ReceiptReader, ReceiptWriter, TdReader, TdWriter, test_utils,
    };
    use alloy_primitives::U256;

    /// Mimics the freezer: copies the canonical block into the ancient store
    /// and drops it from the live store.
    fn freeze<KV, A>(db: &ChainDb<KV, A>, number: u64)
    where
        KV: KeyValueReader + KeyValueWriter + KeyValueIterator,
        A: AncientReader + AncientWriter,
    {
        let hash = db.read_canonical_hash(number).unwrap();
        let block = db.read_block(hash, number).unwrap();
        let receipts = db.read_receipts(hash, number).unwrap();
        let td = db.read_td(hash, number).unwrap();

        db.write_ancient_blocks(&[block], &[receipts], td).unwrap();
        db.delete_block_without_number(hash, number);
        db.delete_canonical_hash(number);
    }

    #[test]
    fn test_reads_survive_freezing() {
        let db = ChainDb::in_memory().with_metrics();
        let chain = test_utils::chain(3, 0);
        for (i, block) in chain.iter().enumerate() {
            let hash = block.hash();
            db.write_block(block);
            db.write_receipts(hash, block.number(), &test_utils::receipts(block, 1));
            db.write_td(hash, block.number(), U256::from(i as u64 + 1));
            db.write_canonical_hash(hash, block.number());
        }

        let before: Vec<_> = chain
            .iter()
            .map(|b| {
                (
                    db.read_block(b.hash(), b.number()),
                    db.read_receipts(b.hash(), b.number()),
                    db.read_td(b.hash(), b.number()),
                    db.read_canonical_hash(b.number()),
                )
            })
            .collect();

        freeze(&db, 0);
        freeze(&db, 1);
        assert_eq!(db.ancients().unwrap(), 2);
        assert!(db.live_store().get(&crate::schema::header_hash_key(0)).unwrap().is_none());

        let after: Vec<_> = chain
            .iter()
            .map(|b| {
                (
                    db.read_block(b.hash(), b.number()),
                    db.read_receipts(b.hash(), b.number()),
                    db.read_td(b.hash(), b.number()),
                    db.read_canonical_hash(b.number()),
                )
            })
            .collect();
        assert_eq!(before, after);
        assert!(after.iter().all(|(block, receipts, td, hash)| {
            block.is_some() && receipts.is_some() && td.is_some() && hash.is_some()
        }));
    }

    #[test]
    fn test_into_parts() {
        let db = ChainDb::in_memory();
        db.write_canonical_hash(alloy_primitives::B256::repeat_byte(1), 0);

        let (live, ancients) = db.into_parts();
        assert_eq!(live.len(), 1);
        assert_eq!(ancients.ancients().unwrap(), 0);
    }
}
