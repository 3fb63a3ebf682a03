//! Typed accessors over the chain store.
//!
//! Each module exposes a reader and a writer extension trait, implemented for
//! every store offering the capabilities the accessors need. Readers require
//! both tiers ([`ChainStoreReader`](crate::ChainStoreReader)), writers only the
//! live tier, so they also accept a [`MemoryBatch`](crate::memory::MemoryBatch).

mod canonical;
pub use canonical::{CanonicalReader, CanonicalWriter};

mod headers;
pub use headers::{HeaderReader, HeaderWriter};

mod bodies;
pub use bodies::{BodyReader, BodyWriter};

mod difficulty;
pub use difficulty::{TdReader, TdWriter};

mod receipts;
pub use receipts::{ReceiptReader, ReceiptWriter};

mod blocks;
pub use blocks::{AncientBlockWriter, BlockReader, BlockWriter};

mod bad_blocks;
pub use bad_blocks::{BAD_BLOCK_LIMIT, BadBlockReader, BadBlockWriter};

mod sync;
pub use sync::{SyncProgressReader, SyncProgressWriter};

mod consensus;
pub use consensus::{ConsensusReader, ConsensusWriter};

mod chain;
pub use chain::ChainHeaderReader;

use crate::{KeyValueWriter, metrics::Metrics};
use alloy_primitives::hex;
use alloy_rlp::Decodable;
use core::fmt::Display;
use tracing::error;

/// Logs a write failure with its context and aborts the process.
///
/// The indices maintained by this crate are only consistent if every write of
/// an operation lands, so there is nothing sensible for a caller to do with
/// a failed write. The process is aborted rather than the thread unwound, as a
/// writer thread dying alone would leave the rest of the node running on top
/// of a half-written index. Test builds panic instead.
#[track_caller]
pub(crate) fn fatal(msg: &str, key: &[u8], err: &dyn Display) -> ! {
    let key = hex::encode_prefixed(key);
    error!(target: "rawdb", %key, %err, "{msg}");
    #[cfg(test)]
    panic!("{msg}: key={key} err={err}");
    #[cfg(not(test))]
    std::process::abort();
}

#[track_caller]
pub(crate) fn put_or_fatal<DB>(db: &DB, key: &[u8], value: &[u8], msg: &str)
where
    DB: KeyValueWriter + ?Sized,
{
    if let Err(err) = db.put(key, value) {
        fatal(msg, key, &err);
    }
}

#[track_caller]
pub(crate) fn delete_or_fatal<DB>(db: &DB, key: &[u8], msg: &str)
where
    DB: KeyValueWriter + ?Sized,
{
    if let Err(err) = db.delete(key) {
        fatal(msg, key, &err);
    }
}

/// Decodes a stored RLP value, counting failures under `entity`.
pub(crate) fn decode_rlp<T: Decodable>(entity: &'static str, data: &[u8]) -> alloy_rlp::Result<T> {
    alloy_rlp::decode_exact(data).inspect_err(|_| Metrics::record_decode_failure(entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatabaseError, test_utils};
    use alloy_primitives::B256;
    use atlas_primitives::Uptime;

    /// A live store refusing every write.
    #[derive(Debug)]
    struct ReadOnlyStore;

    impl KeyValueWriter for ReadOnlyStore {
        fn put(&self, _key: &[u8], _value: &[u8]) -> Result<(), DatabaseError> {
            Err(DatabaseError::Write("read-only".into()))
        }

        fn delete(&self, _key: &[u8]) -> Result<(), DatabaseError> {
            Err(DatabaseError::Write("read-only".into()))
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    #[should_panic(expected = "Failed to store hash to number mapping")]
    fn test_header_write_failure_is_fatal() {
        init_tracing();
        ReadOnlyStore.write_header(&test_utils::header(1, B256::ZERO, 0));
    }

    #[test]
    #[should_panic(expected = "Failed to store block body")]
    fn test_block_write_failure_is_fatal() {
        init_tracing();
        ReadOnlyStore.write_block(&test_utils::block(1, B256::ZERO, 1, 0));
    }

    #[test]
    #[should_panic(expected = "Failed to delete block receipts")]
    fn test_block_delete_failure_is_fatal() {
        init_tracing();
        ReadOnlyStore.delete_block(B256::ZERO, 1);
    }

    #[test]
    #[should_panic(expected = "Failed to store updated uptime")]
    fn test_uptime_write_failure_is_fatal() {
        init_tracing();
        ReadOnlyStore.write_accumulated_epoch_uptime(1, &Uptime::default());
    }

    #[test]
    #[should_panic(expected = "key=0x4c617374426c6f636b")]
    fn test_fatal_reports_key() {
        ReadOnlyStore.write_head_block_hash(B256::ZERO);
    }
}
