//! Whole-block assembly, removal and migration into the ancient store.

use super::{
    BodyReader, BodyWriter, CanonicalReader, HeaderReader, HeaderWriter, ReceiptWriter, TdWriter,
};
use crate::{
    AncientWriteOp, AncientWriter, ChainStoreReader, DatabaseError, KeyValueWriter,
    schema::FreezerTable,
};
use alloy_primitives::{B256, U256};
use atlas_primitives::{Block, Header, Receipt, StoredReceipt};
use tracing::{debug, error};

/// Reads whole blocks and walks the header chain.
pub trait BlockReader: ChainStoreReader {
    /// Assembles block `(number, hash)` from its header and body.
    ///
    /// Returns `None` if either part is missing.
    fn read_block(&self, hash: B256, number: u64) -> Option<Block> {
        let header = self.read_header(hash, number)?;
        let body = self.read_body(hash, number)?;
        Some(Block::new_with_header(header).with_body(body))
    }

    /// Returns the block pointed to by the head block hash.
    fn read_head_block(&self) -> Option<Block> {
        let hash = self.read_head_block_hash()?;
        let number = self.read_header_number(hash)?;
        self.read_block(hash, number)
    }

    /// Returns the most recent header that is an ancestor of both `a` and `b`,
    /// each being counted as an ancestor of itself.
    ///
    /// Returns `None` if a missing parent interrupts either walk.
    fn find_common_ancestor(&self, a: &Header, b: &Header) -> Option<Header> {
        let mut a = a.clone();
        let mut b = b.clone();

        while a.number > b.number {
            a = self.read_header(a.parent_hash, a.number.checked_sub(1)?)?;
        }
        while b.number > a.number {
            b = self.read_header(b.parent_hash, b.number.checked_sub(1)?)?;
        }

        let (mut a_hash, mut b_hash) = (a.hash_slow(), b.hash_slow());
        while a_hash != b_hash {
            let number = a.number.checked_sub(1)?;
            a_hash = a.parent_hash;
            b_hash = b.parent_hash;
            a = self.read_header(a_hash, number)?;
            b = self.read_header(b_hash, number)?;
        }
        Some(a)
    }
}

impl<T: ChainStoreReader + ?Sized> BlockReader for T {}

/// Writes and removes whole blocks in the live store.
pub trait BlockWriter: KeyValueWriter {
    /// Stores the body, then the header of `block`.
    fn write_block(&self, block: &Block) {
        let hash = block.hash();
        self.write_body(hash, block.number(), &block.body());
        self.write_header(&block.header);
    }

    /// Removes every record of block `(number, hash)`: receipts, header with
    /// its hash→number mapping, body and total difficulty.
    fn delete_block(&self, hash: B256, number: u64) {
        self.delete_receipts(hash, number);
        self.delete_header(hash, number);
        self.delete_body(hash, number);
        self.delete_td(hash, number);
    }

    /// Like [`delete_block`](Self::delete_block) but keeps the hash→number
    /// mapping.
    fn delete_block_without_number(&self, hash: B256, number: u64) {
        self.delete_receipts(hash, number);
        self.delete_header_without_number(hash, number);
        self.delete_body(hash, number);
        self.delete_td(hash, number);
    }
}

impl<T: KeyValueWriter + ?Sized> BlockWriter for T {}

/// Moves finalized blocks into the ancient store.
pub trait AncientBlockWriter: AncientWriter {
    /// Appends `blocks` and their `receipts` to the ancient tables in a single
    /// batch and returns the number of bytes written.
    ///
    /// `td` is the total difficulty of the first block; every later block adds
    /// its own difficulty. Either every table receives every block or, on
    /// error, none of them changes.
    fn write_ancient_blocks(
        &self,
        blocks: &[Block],
        receipts: &[Vec<Receipt>],
        td: U256,
    ) -> Result<u64, DatabaseError> {
        if blocks.len() != receipts.len() {
            return Err(DatabaseError::BatchLengthMismatch {
                blocks: blocks.len(),
                receipts: receipts.len(),
            });
        }

        let mut td = td;
        let result = self.modify_ancients(|op| {
            for (i, (block, receipts)) in blocks.iter().zip(receipts).enumerate() {
                if i > 0 {
                    td += block.difficulty();
                }
                append_ancient_block(op, block, receipts, td)?;
            }
            Ok(())
        });

        match &result {
            Ok(size) => {
                debug!(target: "rawdb", blocks = blocks.len(), size, "Wrote ancient blocks")
            }
            Err(err) => error!(target: "rawdb", blocks = blocks.len(), %err, "Failed to write ancient blocks"),
        }
        result
    }
}

impl<T: AncientWriter + ?Sized> AncientBlockWriter for T {}

fn append_ancient_block(
    op: &mut dyn AncientWriteOp,
    block: &Block,
    receipts: &[Receipt],
    td: U256,
) -> Result<(), DatabaseError> {
    let number = block.number();
    let stored: Vec<StoredReceipt> = receipts.iter().map(StoredReceipt::from).collect();

    op.append_raw(FreezerTable::Hashes, number, block.hash().as_slice())?;
    op.append_raw(FreezerTable::Headers, number, &alloy_rlp::encode(&block.header))?;
    op.append_raw(FreezerTable::Bodies, number, &alloy_rlp::encode(block.body()))?;
    op.append_raw(FreezerTable::Receipts, number, &alloy_rlp::encode(&stored))?;
    op.append_raw(FreezerTable::Difficulties, number, &alloy_rlp::encode(td))
}
