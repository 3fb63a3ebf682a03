//! In-memory store backends.
//!
//! These back the test-suite and embedders that do not need persistence. They
//! follow the same contracts as on-disk engines, including the atomicity of
//! ancient batches.

mod kv;
pub use kv::MemoryDb;

mod batch;
pub use batch::MemoryBatch;

mod ancient;
pub use ancient::MemoryAncients;
