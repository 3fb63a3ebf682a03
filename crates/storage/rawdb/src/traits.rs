//! Interfaces of the two backing stores.
//!
//! The live tier is a plain ordered key/value store. The ancient tier is a set
//! of parallel, append-only [`FreezerTable`]s indexed by block number. Both take
//! `&self` everywhere: backends are shared between the importer, the freezer and
//! any number of readers, and serialize concurrent access internally.

use crate::{DatabaseError, schema::FreezerTable};

/// Iterator over `(key, value)` pairs in ascending key order.
pub type KeyValueIter<'a> = Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

/// Read access to the live key/value store.
pub trait KeyValueReader {
    /// Retrieves the value stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, DatabaseError>;

    /// Returns whether a value is stored under `key`.
    fn has(&self, key: &[u8]) -> Result<bool, DatabaseError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Write access to the live key/value store.
pub trait KeyValueWriter {
    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError>;

    /// Removes `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), DatabaseError>;
}

/// Ordered iteration over the live key/value store.
pub trait KeyValueIterator {
    /// Iterates over every key starting with `prefix` that is greater than or
    /// equal to `prefix ++ start`, in ascending byte order.
    ///
    /// The iterator is lazy and need not be a snapshot: callers stopping early
    /// only pay for the entries they consumed.
    fn iter(&self, prefix: &[u8], start: &[u8]) -> Result<KeyValueIter<'_>, DatabaseError>;
}

/// Read access to the ancient store.
pub trait AncientReader {
    /// Retrieves item `number` of `table`, or `None` if it has not been frozen.
    fn ancient(&self, table: FreezerTable, number: u64) -> Result<Option<Vec<u8>>, DatabaseError>;

    /// Returns whether item `number` of `table` has been frozen.
    fn has_ancient(&self, table: FreezerTable, number: u64) -> Result<bool, DatabaseError> {
        Ok(number < self.ancients()? && self.ancient(table, number)?.is_some())
    }

    /// Returns the number of items frozen, i.e. the next block number to append.
    fn ancients(&self) -> Result<u64, DatabaseError>;
}

/// A pending batch of appends to the ancient store.
pub trait AncientWriteOp {
    /// Appends an already encoded item to `table`.
    ///
    /// `number` must equal the number of items in the table, including items
    /// appended earlier in the same batch.
    fn append_raw(
        &mut self,
        table: FreezerTable,
        number: u64,
        item: &[u8],
    ) -> Result<(), DatabaseError>;
}

/// Write access to the ancient store.
pub trait AncientWriter {
    /// Runs `f` against a new batch and commits the batch if `f` succeeds.
    ///
    /// A batch is all-or-nothing: if `f` or the commit fails, no table changes.
    /// Returns the number of bytes appended.
    ///
    /// Backends may hold an exclusive lock for the duration of `f`, so `f` must
    /// not call back into the same store, not even to read. Read what the batch
    /// needs before calling this.
    fn modify_ancients<F>(&self, f: F) -> Result<u64, DatabaseError>
    where
        F: FnOnce(&mut dyn AncientWriteOp) -> Result<(), DatabaseError>;
}

/// A store that can serve every chain read: the live tier with iteration plus
/// the ancient tier.
pub trait ChainStoreReader: KeyValueReader + KeyValueIterator + AncientReader {}

impl<T> ChainStoreReader for T where T: KeyValueReader + KeyValueIterator + AncientReader + ?Sized {}

impl<T: KeyValueReader + ?Sized> KeyValueReader for &T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, DatabaseError> {
        (**self).get(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool, DatabaseError> {
        (**self).has(key)
    }
}

impl<T: KeyValueWriter + ?Sized> KeyValueWriter for &T {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), DatabaseError> {
        (**self).delete(key)
    }
}

impl<T: KeyValueIterator + ?Sized> KeyValueIterator for &T {
    fn iter(&self, prefix: &[u8], start: &[u8]) -> Result<KeyValueIter<'_>, DatabaseError> {
        (**self).iter(prefix, start)
    }
}

impl<T: AncientReader + ?Sized> AncientReader for &T {
    fn ancient(&self, table: FreezerTable, number: u64) -> Result<Option<Vec<u8>>, DatabaseError> {
        (**self).ancient(table, number)
    }

    fn has_ancient(&self, table: FreezerTable, number: u64) -> Result<bool, DatabaseError> {
        (**self).has_ancient(table, number)
    }

    fn ancients(&self) -> Result<u64, DatabaseError> {
        (**self).ancients()
    }
}
