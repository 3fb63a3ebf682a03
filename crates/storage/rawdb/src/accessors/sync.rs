//! Sync and indexing progress markers.

use super::{decode_rlp, delete_or_fatal, put_or_fatal};
use crate::{
    KeyValueReader, KeyValueWriter,
    schema::{FAST_TRIE_PROGRESS_KEY, FAST_TX_LOOKUP_LIMIT_KEY, LAST_PIVOT_KEY, TX_INDEX_TAIL_KEY},
    tiered::read_live,
};
use alloy_primitives::U256;
use tracing::error;

fn read_fixed_u64<DB>(db: &DB, key: &[u8]) -> Option<u64>
where
    DB: KeyValueReader + ?Sized,
{
    let data = read_live(db, key)?;
    let bytes: [u8; 8] = data.as_slice().try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// Reads the sync progress markers.
pub trait SyncProgressReader: KeyValueReader {
    /// Returns the pivot block number of the last fast sync.
    fn read_last_pivot_number(&self) -> Option<u64> {
        let data = read_live(self, LAST_PIVOT_KEY)?;
        decode_rlp("last_pivot", &data)
            .inspect_err(|err| error!(target: "rawdb", %err, "Invalid pivot block number in database"))
            .ok()
    }

    /// Returns the number of trie nodes fast synced so far, `0` if unknown.
    fn read_fast_trie_progress(&self) -> u64 {
        read_live(self, FAST_TRIE_PROGRESS_KEY)
            .and_then(|data| U256::try_from_be_slice(&data))
            .map_or(0, |count| count.saturating_to())
    }

    /// Returns the oldest block whose transactions are indexed.
    fn read_tx_index_tail(&self) -> Option<u64> {
        read_fixed_u64(self, TX_INDEX_TAIL_KEY)
    }

    /// Returns the oldest block whose transactions were indexed by fast sync.
    fn read_fast_tx_lookup_limit(&self) -> Option<u64> {
        read_fixed_u64(self, FAST_TX_LOOKUP_LIMIT_KEY)
    }
}

impl<T: KeyValueReader + ?Sized> SyncProgressReader for T {}

/// Writes the sync progress markers.
pub trait SyncProgressWriter: KeyValueWriter {
    /// Stores the pivot block number of the last fast sync.
    fn write_last_pivot_number(&self, pivot: u64) {
        put_or_fatal(self, LAST_PIVOT_KEY, &alloy_rlp::encode(pivot), "Failed to store pivot block number");
    }

    /// Removes the pivot block number.
    fn delete_last_pivot_number(&self) {
        delete_or_fatal(self, LAST_PIVOT_KEY, "Failed to delete pivot block number");
    }

    /// Stores the number of trie nodes fast synced so far.
    fn write_fast_trie_progress(&self, count: u64) {
        put_or_fatal(
            self,
            FAST_TRIE_PROGRESS_KEY,
            &U256::from(count).to_be_bytes_trimmed_vec(),
            "Failed to store fast sync trie progress",
        );
    }

    /// Removes the fast sync trie progress.
    fn delete_fast_trie_progress(&self) {
        delete_or_fatal(self, FAST_TRIE_PROGRESS_KEY, "Failed to delete fast sync trie progress");
    }

    /// Stores the oldest block whose transactions are indexed.
    fn write_tx_index_tail(&self, number: u64) {
        put_or_fatal(
            self,
            TX_INDEX_TAIL_KEY,
            &number.to_be_bytes(),
            "Failed to store the transaction index tail",
        );
    }

    /// Removes the transaction index tail.
    fn delete_tx_index_tail(&self) {
        delete_or_fatal(self, TX_INDEX_TAIL_KEY, "Failed to delete the transaction index tail");
    }

    /// Stores the oldest block whose transactions were indexed by fast sync.
    fn write_fast_tx_lookup_limit(&self, number: u64) {
        put_or_fatal(
            self,
            FAST_TX_LOOKUP_LIMIT_KEY,
            &number.to_be_bytes(),
            "Failed to store transaction lookup limit for fast sync",
        );
    }

    /// Removes the fast sync transaction lookup limit.
    fn delete_fast_tx_lookup_limit(&self) {
        delete_or_fatal(
            self,
            FAST_TX_LOOKUP_LIMIT_KEY,
            "Failed to delete transaction lookup limit for fast sync",
        );
    }
}

impl<T: KeyValueWriter + ?Sized> SyncProgressWriter for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDb;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0)]
    #[case::single_byte(0x7f)]
    #[case::max(u64::MAX)]
    fn test_last_pivot_number(#[case] pivot: u64) {
        let db = MemoryDb::new();
        assert_eq!(db.read_last_pivot_number(), None);

        db.write_last_pivot_number(pivot);
        assert_eq!(db.read_last_pivot_number(), Some(pivot));

        db.delete_last_pivot_number();
        assert_eq!(db.read_last_pivot_number(), None);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::small(300)]
    #[case::max(u64::MAX)]
    fn test_fast_trie_progress(#[case] count: u64) {
        let db = MemoryDb::new();
        assert_eq!(db.read_fast_trie_progress(), 0);

        db.write_fast_trie_progress(count);
        assert_eq!(db.read_fast_trie_progress(), count);

        db.delete_fast_trie_progress();
        assert_eq!(db.read_fast_trie_progress(), 0);
    }

    #[test]
    fn test_fast_trie_progress_is_minimal_big_endian() {
        let db = MemoryDb::new();
        db.write_fast_trie_progress(0x0102);
        assert_eq!(db.get(FAST_TRIE_PROGRESS_KEY).unwrap(), Some(vec![0x01, 0x02]));
    }

    #[test]
    fn test_tx_index_markers() {
        let db = MemoryDb::new();
        assert_eq!(db.read_tx_index_tail(), None);
        assert_eq!(db.read_fast_tx_lookup_limit(), None);

        db.write_tx_index_tail(1_000);
        db.write_fast_tx_lookup_limit(2_000);
        assert_eq!(db.read_tx_index_tail(), Some(1_000));
        assert_eq!(db.read_fast_tx_lookup_limit(), Some(2_000));

        db.delete_tx_index_tail();
        db.delete_fast_tx_lookup_limit();
        assert_eq!(db.read_tx_index_tail(), None);
        assert_eq!(db.read_fast_tx_lookup_limit(), None);
    }

    #[test]
    fn test_malformed_tx_index_tail_reads_as_missing() {
        let db = MemoryDb::new();
        db.put(TX_INDEX_TAIL_KEY, &[0, 1, 2]).unwrap();
        assert_eq!(db.read_tx_index_tail(), None);
    }
}
