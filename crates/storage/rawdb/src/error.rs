use crate::schema::FreezerTable;
use thiserror::Error;

/// Errors reported by the backing stores.
///
/// Accessors never surface these to callers: read errors collapse into absent
/// values and write errors are fatal. They exist so backends can describe what
/// went wrong, and so [`AncientBlockWriter`](crate::AncientBlockWriter) can
/// hand a rejected batch back to the importer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    /// The backend failed to serve a read.
    #[error("read failed: {0}")]
    Read(String),

    /// The backend rejected a put or delete.
    #[error("write failed: {0}")]
    Write(String),

    /// An ancient append did not continue its table contiguously.
    #[error("ancient table {table} expects item {expected}, got {number}")]
    OutOfOrder {
        /// The table appended to.
        table: FreezerTable,
        /// The next item number the table accepts.
        expected: u64,
        /// The item number that was appended.
        number: u64,
    },

    /// An ancient batch left the parallel tables at different heights.
    #[error("ancient tables unaligned after batch: {table} holds {items} items, expected {expected}")]
    Unaligned {
        /// The lagging or leading table.
        table: FreezerTable,
        /// Item count of that table.
        items: u64,
        /// Item count of the hash table.
        expected: u64,
    },

    /// Blocks and receipt lists handed to an ancient batch differ in length.
    #[error("ancient batch has {blocks} blocks but {receipts} receipt lists")]
    BatchLengthMismatch {
        /// Number of blocks.
        blocks: usize,
        /// Number of receipt lists.
        receipts: usize,
    },
}

/// Errors raised while re-deriving receipt and log metadata from a block body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeriveError {
    /// The number of receipts is neither the transaction count nor the
    /// transaction count plus the block finalization receipt.
    #[error("transaction and receipt count mismatch: {transactions} transactions, {receipts} receipts")]
    CountMismatch {
        /// Transactions in the body.
        transactions: usize,
        /// Receipts stored for the block.
        receipts: usize,
    },
}
