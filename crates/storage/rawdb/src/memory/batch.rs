use crate::{DatabaseError, KeyValueWriter};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum BatchOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// A write-only batch of key/value operations.
///
/// Every accessor writer accepts a batch, which lets the importer group the
/// writes of a block and flush them in one go with [`MemoryBatch::write_to`].
#[derive(Debug, Default)]
pub struct MemoryBatch {
    ops: Mutex<Vec<BatchOp>>,
}

impl MemoryBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of buffered operations.
    pub fn len(&self) -> usize {
        self.ops.lock().len()
    }

    /// Returns true if no operation is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replays the buffered operations into `db` in insertion order.
    pub fn write_to<W: KeyValueWriter + ?Sized>(self, db: &W) -> Result<(), DatabaseError> {
        for op in self.ops.into_inner() {
            match op {
                BatchOp::Put(key, value) => db.put(&key, &value)?,
                BatchOp::Delete(key) => db.delete(&key)?,
            }
        }
        Ok(())
    }
}

impl KeyValueWriter for MemoryBatch {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError> {
        self.ops.lock().push(BatchOp::Put(key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), DatabaseError> {
        self.ops.lock().push(BatchOp::Delete(key.to_vec()));
        Ok(())
    }
}
