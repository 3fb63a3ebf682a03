use crate::{AncientReader, AncientWriteOp, AncientWriter, DatabaseError, schema::FreezerTable};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

type Tables = BTreeMap<FreezerTable, Vec<Vec<u8>>>;

/// An in-memory ancient store made of the parallel [`FreezerTable`]s.
#[derive(Debug, Default)]
pub struct MemoryAncients {
    tables: RwLock<Tables>,
}

impl MemoryAncients {
    /// Creates an empty ancient store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every item at or above `items` from all tables.
    pub fn truncate(&self, items: u64) {
        for table in self.tables.write().values_mut() {
            table.truncate(items as usize);
        }
    }
}

fn table_len(tables: &Tables, table: FreezerTable) -> u64 {
    tables.get(&table).map_or(0, |items| items.len() as u64)
}

impl AncientReader for MemoryAncients {
    fn ancient(&self, table: FreezerTable, number: u64) -> Result<Option<Vec<u8>>, DatabaseError> {
        let tables = self.tables.read();
        Ok(tables.get(&table).and_then(|items| items.get(number as usize)).cloned())
    }

    fn ancients(&self) -> Result<u64, DatabaseError> {
        let tables = self.tables.read();
        Ok(table_len(&tables, FreezerTable::Hashes))
    }
}

/// Appends staged on top of the committed tables.
#[derive(Debug)]
struct PendingAppends<'a> {
    committed: &'a Tables,
    staged: Tables,
    size: u64,
}

impl AncientWriteOp for PendingAppends<'_> {
    fn append_raw(
        &mut self,
        table: FreezerTable,
        number: u64,
        item: &[u8],
    ) -> Result<(), DatabaseError> {
        let expected = table_len(self.committed, table) + table_len(&self.staged, table);
        if number != expected {
            return Err(DatabaseError::OutOfOrder { table, expected, number });
        }
        self.staged.entry(table).or_default().push(item.to_vec());
        self.size += item.len() as u64;
        Ok(())
    }
}

impl AncientWriter for MemoryAncients {
    fn modify_ancients<F>(&self, f: F) -> Result<u64, DatabaseError>
    where
        F: FnOnce(&mut dyn AncientWriteOp) -> Result<(), DatabaseError>,
    {
        let mut tables = self.tables.write();

        let mut pending = PendingAppends { committed: &*tables, staged: Tables::new(), size: 0 };
        f(&mut pending)?;
        let PendingAppends { staged, size, .. } = pending;

        let expected = table_len(&tables, FreezerTable::Hashes) +
            table_len(&staged, FreezerTable::Hashes);
        for table in FreezerTable::ALL {
            let items = table_len(&tables, table) + table_len(&staged, table);
            if items != expected {
                return Err(DatabaseError::Unaligned { table, items, expected });
            }
        }

        for (table, items) in staged {
            tables.entry(table).or_default().extend(items);
        }
        debug!(target: "rawdb", items = expected, size, "Committed ancient batch");
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append_all(op: &mut dyn AncientWriteOp, number: u64) -> Result<(), DatabaseError> {
        for table in FreezerTable::ALL {
            op.append_raw(table, number, &[number as u8; 4])?;
        }
        Ok(())
    }

    #[test]
    fn test_batch_commits_aligned_tables() {
        let ancients = MemoryAncients::new();
        let size = ancients
            .modify_ancients(|op| {
                append_all(op, 0)?;
                append_all(op, 1)
            })
            .unwrap();

        assert_eq!(size, 2 * 5 * 4);
        assert_eq!(ancients.ancients().unwrap(), 2);
        assert_eq!(ancients.ancient(FreezerTable::Bodies, 1).unwrap(), Some(vec![1; 4]));
        assert!(ancients.has_ancient(FreezerTable::Receipts, 1).unwrap());
        assert!(!ancients.has_ancient(FreezerTable::Receipts, 2).unwrap());
    }

    #[test]
    fn test_out_of_order_append_discards_batch() {
        let ancients = MemoryAncients::new();
        let err = ancients
            .modify_ancients(|op| {
                append_all(op, 0)?;
                append_all(op, 2)
            })
            .unwrap_err();

        assert_eq!(
            err,
            DatabaseError::OutOfOrder { table: FreezerTable::Hashes, expected: 1, number: 2 }
        );
        assert_eq!(ancients.ancients().unwrap(), 0);
        assert_eq!(ancients.ancient(FreezerTable::Hashes, 0).unwrap(), None);
    }

    #[test]
    fn test_unaligned_batch_is_rejected() {
        let ancients = MemoryAncients::new();
        let err = ancients
            .modify_ancients(|op| op.append_raw(FreezerTable::Hashes, 0, &[0; 32]))
            .unwrap_err();

        assert!(matches!(err, DatabaseError::Unaligned { table: FreezerTable::Headers, .. }));
        assert_eq!(ancients.ancients().unwrap(), 0);
    }

    #[test]
    fn test_store_usable_after_panicking_batch() {
        let ancients = MemoryAncients::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ancients.modify_ancients(|_| panic!("batch writer died"))
        }));
        assert!(result.is_err());
        assert_eq!(ancients.ancients().unwrap(), 0);

        ancients.modify_ancients(|op| append_all(op, 0)).unwrap();
        assert_eq!(ancients.ancients().unwrap(), 1);
    }

    #[test]
    fn test_truncate() {
        let ancients = MemoryAncients::new();
        ancients.modify_ancients(|op| (0..4).try_for_each(|n| append_all(op, n))).unwrap();

        ancients.truncate(2);
        assert_eq!(ancients.ancients().unwrap(), 2);
        assert_eq!(ancients.ancient(FreezerTable::Headers, 2).unwrap(), None);

        // Appending resumes right after the truncation point.
        ancients.modify_ancients(|op| append_all(op, 2)).unwrap();
        assert_eq!(ancients.ancients().unwrap(), 3);
    }
}
