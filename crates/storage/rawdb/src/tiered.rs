//! The two-tier read policy.
//!
//! The freezer moves canonical data from the live store into the ancient store
//! without coordinating with readers. A reader probing the ancient store first
//! and the live store second can miss a record that moved between the two
//! probes, so every lookup that falls through the live store probes the
//! ancient store once more before reporting the record as missing.

use crate::{
    AncientReader, KeyValueReader,
    metrics::{Metrics, ReadSource},
    schema::FreezerTable,
};
use alloy_primitives::B256;
use tracing::debug;

/// Reads `key` from the live store. Backend errors and empty values read as absent.
pub(crate) fn read_live<DB>(db: &DB, key: &[u8]) -> Option<Vec<u8>>
where
    DB: KeyValueReader + ?Sized,
{
    match db.get(key) {
        Ok(data) => data.filter(|data| !data.is_empty()),
        Err(error) => {
            debug!(target: "rawdb", %error, "Live store read failed");
            None
        }
    }
}

/// Reads item `number` of `table` from the ancient store.
pub(crate) fn read_ancient<DB>(db: &DB, table: FreezerTable, number: u64) -> Option<Vec<u8>>
where
    DB: AncientReader + ?Sized,
{
    match db.ancient(table, number) {
        Ok(data) => data.filter(|data| !data.is_empty()),
        Err(error) => {
            debug!(target: "rawdb", %table, number, %error, "Ancient store read failed");
            None
        }
    }
}

/// Returns the canonical hash frozen at `number`, if any.
pub(crate) fn ancient_hash<DB>(db: &DB, number: u64) -> Option<B256>
where
    DB: AncientReader + ?Sized,
{
    read_ancient(db, FreezerTable::Hashes, number).and_then(|data| B256::try_from(data.as_slice()).ok())
}

/// Probes `table` for `number`. The ancient store only holds canonical data, so
/// when `expected` is given the hit is accepted only if the canonical hash at
/// that height matches it.
fn probe_ancient<DB>(
    db: &DB,
    table: FreezerTable,
    number: u64,
    expected: Option<B256>,
) -> Option<Vec<u8>>
where
    DB: AncientReader + ?Sized,
{
    let data = read_ancient(db, table, number)?;
    match expected {
        Some(hash) if ancient_hash(db, number) != Some(hash) => None,
        _ => Some(data),
    }
}

/// Resolves a record that lives in `table` once frozen and is served by `live`
/// before that.
///
/// Probes the ancient store, then the live store, then the ancient store again.
pub(crate) fn read_tiered<DB, F>(
    db: &DB,
    table: FreezerTable,
    number: u64,
    expected: Option<B256>,
    live: F,
) -> Option<Vec<u8>>
where
    DB: AncientReader + ?Sized,
    F: FnOnce() -> Option<Vec<u8>>,
{
    let (data, source) = if let Some(data) = probe_ancient(db, table, number, expected) {
        (Some(data), ReadSource::Ancient)
    } else if let Some(data) = live() {
        (Some(data), ReadSource::Live)
    } else if let Some(data) = probe_ancient(db, table, number, expected) {
        (Some(data), ReadSource::AncientRecheck)
    } else {
        (None, ReadSource::Missing)
    };
    Metrics::record_tiered_read(table, source);
    data
}

/// Resolves the existence of the block `(number, hash)` without fetching payloads.
///
/// Frozen blocks are recognised by their canonical hash, others by `live_key`.
pub(crate) fn has_tiered<DB>(db: &DB, number: u64, hash: B256, live_key: &[u8]) -> bool
where
    DB: KeyValueReader + AncientReader + ?Sized,
{
    if ancient_hash(db, number) == Some(hash) {
        return true;
    }
    match db.has(live_key) {
        Ok(true) => return true,
        Ok(false) => {}
        Err(error) => debug!(target: "rawdb", %error, "Live store existence check failed"),
    }
    ancient_hash(db, number) == Some(hash)
}
