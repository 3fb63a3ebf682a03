//! A bounded record of blocks that failed validation, kept for diagnostics.

use super::{decode_rlp, delete_or_fatal, fatal, put_or_fatal};
use crate::{
    KeyValueReader, KeyValueWriter, metrics::Metrics, schema::BAD_BLOCK_KEY, tiered::read_live,
};
use alloy_primitives::B256;
use alloy_rlp::{RlpDecodable, RlpEncodable};
use atlas_primitives::{Block, Body, Header};
use tracing::{error, info, warn};

/// The maximum number of bad blocks retained.
pub const BAD_BLOCK_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
struct BadBlockEntry {
    header: Header,
    body: Body,
}

impl BadBlockEntry {
    fn into_block(self) -> Block {
        Block::from((self.header, self.body))
    }
}

fn read_entries<DB>(db: &DB) -> alloy_rlp::Result<Vec<BadBlockEntry>>
where
    DB: KeyValueReader + ?Sized,
{
    match read_live(db, BAD_BLOCK_KEY) {
        Some(data) => decode_rlp("bad_blocks", &data),
        None => Ok(Vec::new()),
    }
}

/// Reads the bad block list.
pub trait BadBlockReader: KeyValueReader {
    /// Returns the bad block with the given hash.
    fn read_bad_block(&self, hash: B256) -> Option<Block> {
        self.read_all_bad_blocks().into_iter().find(|block| block.hash() == hash)
    }

    /// Returns every retained bad block, highest number first.
    fn read_all_bad_blocks(&self) -> Vec<Block> {
        match read_entries(self) {
            Ok(entries) => entries.into_iter().map(BadBlockEntry::into_block).collect(),
            Err(err) => {
                error!(target: "rawdb", %err, "Invalid bad block list RLP");
                Vec::new()
            }
        }
    }
}

impl<T: KeyValueReader + ?Sized> BadBlockReader for T {}

/// Maintains the bad block list.
pub trait BadBlockWriter: KeyValueReader + KeyValueWriter {
    /// Adds `block` to the list, keeping the [`BAD_BLOCK_LIMIT`] highest blocks.
    ///
    /// A block already on the list is skipped. An existing list that no
    /// longer decodes is treated like a failed write.
    fn write_bad_block(&self, block: &Block) {
        let mut entries: Vec<BadBlockEntry> = match self.get(BAD_BLOCK_KEY) {
            Ok(Some(data)) if !data.is_empty() => match decode_rlp("bad_blocks", &data) {
                Ok(entries) => entries,
                Err(err) => fatal("Failed to decode old bad blocks", BAD_BLOCK_KEY, &err),
            },
            Ok(_) => Vec::new(),
            Err(error) => {
                warn!(target: "rawdb", %error, "Failed to load old bad blocks");
                Vec::new()
            }
        };

        let (number, hash) = (block.number(), block.hash());
        if entries.iter().any(|e| e.header.number == number && e.header.hash_slow() == hash) {
            info!(target: "rawdb", number, %hash, "Skip duplicated bad block");
            return;
        }

        entries.push(BadBlockEntry { header: block.header.clone(), body: block.body() });
        entries.sort_by(|a, b| b.header.number.cmp(&a.header.number));
        entries.truncate(BAD_BLOCK_LIMIT);

        put_or_fatal(self, BAD_BLOCK_KEY, &alloy_rlp::encode(&entries), "Failed to write bad blocks");
        Metrics::record_bad_block();
    }

    /// Clears the bad block list.
    fn delete_bad_blocks(&self) {
        delete_or_fatal(self, BAD_BLOCK_KEY, "Failed to delete bad blocks");
    }
}

impl<T: KeyValueReader + KeyValueWriter + ?Sized> BadBlockWriter for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChainDb, test_utils};

    #[test]
    fn test_bad_block_list_is_bounded_and_sorted() {
        let db = ChainDb::in_memory();
        assert!(db.read_all_bad_blocks().is_empty());

        let blocks: Vec<_> = (0..15u64)
            .map(|i| test_utils::block((i * 7) % 15, B256::ZERO, 1, i as u8))
            .collect();
        for block in &blocks {
            db.write_bad_block(block);
        }

        let stored = db.read_all_bad_blocks();
        assert_eq!(stored.len(), BAD_BLOCK_LIMIT);
        let numbers: Vec<_> = stored.iter().map(Block::number).collect();
        assert_eq!(numbers, (5..15).rev().collect::<Vec<_>>());

        let lowest_kept = blocks.iter().find(|b| b.number() == 5).unwrap();
        assert_eq!(db.read_bad_block(lowest_kept.hash()).as_ref(), Some(lowest_kept));
        let evicted = blocks.iter().find(|b| b.number() == 4).unwrap();
        assert!(db.read_bad_block(evicted.hash()).is_none());
    }

    #[test]
    fn test_duplicate_bad_block_is_skipped() {
        let db = ChainDb::in_memory();
        let block = test_utils::block(3, B256::ZERO, 2, 0);
        let sibling = test_utils::block(3, B256::ZERO, 2, 1);

        db.write_bad_block(&block);
        db.write_bad_block(&block);
        db.write_bad_block(&sibling);

        let stored = db.read_all_bad_blocks();
        assert_eq!(stored.len(), 2);
        assert_eq!(db.read_bad_block(block.hash()), Some(block));
    }

    #[test]
    fn test_delete_bad_blocks() {
        let db = ChainDb::in_memory();
        db.write_bad_block(&test_utils::block(1, B256::ZERO, 0, 0));
        db.delete_bad_blocks();
        assert!(db.read_all_bad_blocks().is_empty());
    }

    #[test]
    fn test_corrupt_list_reads_as_empty() {
        let db = ChainDb::in_memory();
        db.put(BAD_BLOCK_KEY, &[0xc1]).unwrap();
        assert!(db.read_all_bad_blocks().is_empty());
    }

    #[test]
    #[should_panic(expected = "Failed to decode old bad blocks")]
    fn test_write_over_corrupt_list_is_fatal() {
        let db = ChainDb::in_memory();
        db.put(BAD_BLOCK_KEY, &[0xc1]).unwrap();
        db.write_bad_block(&test_utils::block(1, B256::ZERO, 0, 0));
    }
}
