#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::{DatabaseError, DeriveError};

pub mod schema;

mod traits;
pub use traits::{
    AncientReader, AncientWriteOp, AncientWriter, ChainStoreReader, KeyValueIter,
    KeyValueIterator, KeyValueReader, KeyValueWriter,
};

pub mod memory;

mod metrics;
mod tiered;

mod derive;
pub use derive::{derive_log_fields, derive_receipt_fields};

mod accessors;
pub use accessors::{
    AncientBlockWriter, BAD_BLOCK_LIMIT, BadBlockReader, BadBlockWriter, BlockReader,
    BlockWriter, BodyReader, BodyWriter, CanonicalReader, CanonicalWriter, ChainHeaderReader,
    ConsensusReader, ConsensusWriter, HeaderReader, HeaderWriter, ReceiptReader, ReceiptWriter,
    SyncProgressReader, SyncProgressWriter, TdReader, TdWriter,
};

mod chaindb;
pub use chaindb::ChainDb;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
