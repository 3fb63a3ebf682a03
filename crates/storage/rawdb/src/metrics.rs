//! Metrics for the chain storage accessors.

use crate::schema::FreezerTable;

/// Where a two-tier read was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadSource {
    /// Found in the ancient store on the first probe.
    Ancient,
    /// Found in the live store.
    Live,
    /// Found in the ancient store only on the second probe, after the freezer
    /// moved the record out of the live store.
    AncientRecheck,
    /// Found nowhere.
    Missing,
}

impl ReadSource {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Ancient => "ancient",
            Self::Live => "live",
            Self::AncientRecheck => "ancient_recheck",
            Self::Missing => "missing",
        }
    }
}

/// Container for the storage metrics.
#[derive(Debug, Clone)]
pub(crate) struct Metrics;

impl Metrics {
    /// Identifier for the counter of two-tier reads, labelled by table and source.
    pub(crate) const TIERED_READS_TOTAL: &'static str = "atlas_rawdb_tiered_reads_total";

    /// Identifier for the counter of records that were present but failed to decode.
    pub(crate) const DECODE_FAILURES_TOTAL: &'static str = "atlas_rawdb_decode_failures_total";

    /// Entity labels of [`Self::DECODE_FAILURES_TOTAL`].
    pub(crate) const DECODED_ENTITIES: [&'static str; 7] =
        ["header", "body", "receipts", "td", "bad_blocks", "last_pivot", "uptime"];

    /// Identifier for the counter of recorded bad blocks.
    pub(crate) const BAD_BLOCKS_RECORDED_TOTAL: &'static str =
        "atlas_rawdb_bad_blocks_recorded_total";

    /// Describes and zeroes the storage metrics.
    pub(crate) fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::TIERED_READS_TOTAL,
            metrics::Unit::Count,
            "Chain reads resolved through the ancient and live stores, by table and source",
        );
        metrics::describe_counter!(
            Self::DECODE_FAILURES_TOTAL,
            metrics::Unit::Count,
            "Stored chain records that failed to decode and were reported as missing",
        );
        metrics::describe_counter!(
            Self::BAD_BLOCKS_RECORDED_TOTAL,
            metrics::Unit::Count,
            "Blocks added to the bad block list",
        );
    }

    fn zero() {
        for table in FreezerTable::ALL {
            for source in [
                ReadSource::Ancient,
                ReadSource::Live,
                ReadSource::AncientRecheck,
                ReadSource::Missing,
            ] {
                metrics::counter!(
                    Self::TIERED_READS_TOTAL,
                    "table" => table.to_string(),
                    "source" => source.as_str(),
                )
                .increment(0);
            }
        }
        for entity in Self::DECODED_ENTITIES {
            metrics::counter!(Self::DECODE_FAILURES_TOTAL, "entity" => entity).increment(0);
        }
        metrics::counter!(Self::BAD_BLOCKS_RECORDED_TOTAL).increment(0);
    }

    pub(crate) fn record_tiered_read(table: FreezerTable, source: ReadSource) {
        metrics::counter!(
            Self::TIERED_READS_TOTAL,
            "table" => table.to_string(),
            "source" => source.as_str(),
        )
        .increment(1);
    }

    pub(crate) fn record_decode_failure(entity: &'static str) {
        debug_assert!(Self::DECODED_ENTITIES.contains(&entity), "unknown entity label {entity}");
        metrics::counter!(Self::DECODE_FAILURES_TOTAL, "entity" => entity).increment(1);
    }

    pub(crate) fn record_bad_block() {
        metrics::counter!(Self::BAD_BLOCKS_RECORDED_TOTAL).increment(1);
    }
}
