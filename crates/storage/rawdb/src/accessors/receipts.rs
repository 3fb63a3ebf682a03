//! Receipt storage.
//!
//! Receipts are stored in their consensus form and re-derived against the
//! block body on every full read.

use super::{BodyReader, decode_rlp, delete_or_fatal, put_or_fatal};
use crate::{
    ChainStoreReader, KeyValueWriter,
    derive::{derive_log_fields, derive_receipt_fields},
    schema::{self, FreezerTable},
    tiered::{has_tiered, read_live, read_tiered},
};
use alloy_primitives::B256;
use atlas_primitives::{Log, Receipt, StoredReceipt};
use tracing::error;

/// Reads block receipts.
pub trait ReceiptReader: ChainStoreReader {
    /// Returns whether the receipts of block `(number, hash)` are stored.
    fn has_receipts(&self, hash: B256, number: u64) -> bool {
        has_tiered(self, number, hash, &schema::block_receipts_key(number, hash))
    }

    /// Returns the RLP encoded receipts of block `(number, hash)`.
    fn read_receipts_rlp(&self, hash: B256, number: u64) -> Option<Vec<u8>> {
        read_tiered(self, FreezerTable::Receipts, number, Some(hash), || {
            read_live(self, &schema::block_receipts_key(number, hash))
        })
    }

    /// Returns the receipts of block `(number, hash)` holding only the
    /// consensus fields and the bloom.
    fn read_raw_receipts(&self, hash: B256, number: u64) -> Option<Vec<Receipt>> {
        let stored = read_stored_receipts(self, hash, number)?;
        stored
            .into_iter()
            .map(Receipt::try_from)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| error!(target: "rawdb", %hash, number, %err, "Invalid receipt array RLP"))
            .ok()
    }

    /// Returns the receipts of block `(number, hash)` with their block context
    /// derived from the stored body.
    ///
    /// Returns `None` if the body is missing or does not fit the receipts.
    fn read_receipts(&self, hash: B256, number: u64) -> Option<Vec<Receipt>> {
        let mut receipts = self.read_raw_receipts(hash, number)?;
        let Some(body) = self.read_body(hash, number) else {
            error!(target: "rawdb", %hash, number, "Missing body but have receipt");
            return None;
        };
        derive_receipt_fields(&mut receipts, hash, number, &body.transactions)
            .inspect_err(|err| error!(target: "rawdb", %hash, number, %err, "Failed to derive block receipts fields"))
            .ok()?;
        Some(receipts)
    }

    /// Returns the logs of block `(number, hash)`, grouped by receipt, with
    /// their block context derived from the stored body.
    ///
    /// Cheaper than [`read_receipts`](Self::read_receipts) as the receipts
    /// themselves are never assembled.
    fn read_logs(&self, hash: B256, number: u64) -> Option<Vec<Vec<Log>>> {
        let stored = read_stored_receipts(self, hash, number)?;
        let mut logs: Vec<Vec<Log>> = stored
            .into_iter()
            .map(|receipt| receipt.logs.into_iter().map(Log::from).collect())
            .collect();

        let Some(body) = self.read_body(hash, number) else {
            error!(target: "rawdb", %hash, number, "Missing body but have receipt");
            return None;
        };
        derive_log_fields(&mut logs, hash, number, &body.transactions)
            .inspect_err(|err| error!(target: "rawdb", %hash, number, %err, "Failed to derive block receipts fields"))
            .ok()?;
        Some(logs)
    }
}

impl<T: ChainStoreReader + ?Sized> ReceiptReader for T {}

fn read_stored_receipts<DB>(db: &DB, hash: B256, number: u64) -> Option<Vec<StoredReceipt>>
where
    DB: ChainStoreReader + ?Sized,
{
    let data = db.read_receipts_rlp(hash, number)?;
    decode_rlp("receipts", &data)
        .inspect_err(|err| error!(target: "rawdb", %hash, number, %err, "Invalid receipt array RLP"))
        .ok()
}

/// Writes block receipts.
pub trait ReceiptWriter: KeyValueWriter {
    /// Stores the consensus fields of `receipts` for block `(number, hash)`.
    fn write_receipts(&self, hash: B256, number: u64, receipts: &[Receipt]) {
        let stored: Vec<StoredReceipt> = receipts.iter().map(StoredReceipt::from).collect();
        put_or_fatal(
            self,
            &schema::block_receipts_key(number, hash),
            &alloy_rlp::encode(&stored),
            "Failed to store block receipts",
        );
    }

    /// Removes the receipts of block `(number, hash)`.
    fn delete_receipts(&self, hash: B256, number: u64) {
        delete_or_fatal(
            self,
            &schema::block_receipts_key(number, hash),
            "Failed to delete block receipts",
        );
    }
}

impl<T: KeyValueWriter + ?Sized> ReceiptWriter for T {}
