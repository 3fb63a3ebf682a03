use crate::{DatabaseError, KeyValueIter, KeyValueIterator, KeyValueReader, KeyValueWriter};
use parking_lot::RwLock;
use std::collections::{BTreeMap, VecDeque};

/// Number of entries copied out of the store per lock acquisition while iterating.
const ITER_CHUNK: usize = 64;

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// An ordered in-memory key/value store.
#[derive(Debug, Default)]
pub struct MemoryDb {
    entries: RwLock<Entries>,
}

impl MemoryDb {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueReader for MemoryDb {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, DatabaseError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn has(&self, key: &[u8]) -> Result<bool, DatabaseError> {
        Ok(self.entries.read().contains_key(key))
    }
}

impl KeyValueWriter for MemoryDb {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError> {
        self.entries.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), DatabaseError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

impl KeyValueIterator for MemoryDb {
    fn iter(&self, prefix: &[u8], start: &[u8]) -> Result<KeyValueIter<'_>, DatabaseError> {
        let mut from = prefix.to_vec();
        from.extend_from_slice(start);
        Ok(Box::new(MemoryIter {
            entries: &self.entries,
            prefix: prefix.to_vec(),
            next: Some(from),
            buffered: VecDeque::new(),
        }))
    }
}

/// Walks a prefix of a [`MemoryDb`] in chunks of [`ITER_CHUNK`] entries.
///
/// The read lock is only held while a chunk is copied out, so writers are
/// never blocked by an iteration in progress. Entries written behind the
/// cursor are not observed, entries written ahead of it are.
#[derive(Debug)]
struct MemoryIter<'a> {
    entries: &'a RwLock<Entries>,
    prefix: Vec<u8>,
    /// Smallest key of the next chunk, `None` once the prefix is exhausted.
    next: Option<Vec<u8>>,
    buffered: VecDeque<(Vec<u8>, Vec<u8>)>,
}

impl MemoryIter<'_> {
    fn fill(&mut self) {
        let Some(from) = self.next.take() else { return };
        let entries = self.entries.read();
        self.buffered.extend(
            entries
                .range(from..)
                .take_while(|(key, _)| key.starts_with(&self.prefix))
                .take(ITER_CHUNK)
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        if self.buffered.len() == ITER_CHUNK {
            // The smallest key strictly greater than the last one copied.
            self.next = self.buffered.back().map(|(key, _)| {
                let mut successor = key.clone();
                successor.push(0);
                successor
            });
        }
    }
}

impl Iterator for MemoryIter<'_> {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffered.is_empty() {
            self.fill();
        }
        self.buffered.pop_front()
    }
}
