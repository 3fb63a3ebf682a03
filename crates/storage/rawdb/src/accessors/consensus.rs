//! Records kept on behalf of the Istanbul consensus engine.

use super::{decode_rlp, delete_or_fatal, put_or_fatal};
use crate::{KeyValueReader, KeyValueWriter, schema, tiered::read_live};
use alloy_primitives::B256;
use atlas_primitives::Uptime;
use tracing::{error, trace, warn};

/// Reads the consensus engine records.
pub trait ConsensusReader: KeyValueReader {
    /// Returns the parent hash of the block a randomness `commitment` was made in.
    fn read_random_commitment_cache(&self, commitment: B256) -> Option<B256> {
        match self.get(&schema::randomness_commitment_key(commitment)) {
            Ok(data) => data.and_then(|data| B256::try_from(data.as_slice()).ok()),
            Err(error) => {
                warn!(target: "rawdb", %commitment, %error, "Failed to read randomness commitment cache entry");
                None
            }
        }
    }

    /// Returns the uptime accumulated so far by the validators of `epoch`.
    fn read_accumulated_epoch_uptime(&self, epoch: u64) -> Option<Uptime> {
        let Some(data) = read_live(self, &schema::uptime_key(epoch)) else {
            trace!(target: "rawdb", epoch, "No accumulated uptime for epoch");
            return None;
        };
        decode_rlp("uptime", &data)
            .inspect_err(|err| error!(target: "rawdb", epoch, %err, "Invalid uptime RLP"))
            .ok()
    }
}

impl<T: KeyValueReader + ?Sized> ConsensusReader for T {}

/// Writes the consensus engine records.
pub trait ConsensusWriter: KeyValueWriter {
    /// Associates a randomness `commitment` with the parent hash of its block.
    fn write_random_commitment_cache(&self, commitment: B256, parent_hash: B256) {
        put_or_fatal(
            self,
            &schema::randomness_commitment_key(commitment),
            parent_hash.as_slice(),
            "Failed to store randomness commitment cache entry",
        );
    }

    /// Removes the cached parent hash of `commitment`.
    fn delete_random_commitment_cache(&self, commitment: B256) {
        delete_or_fatal(
            self,
            &schema::randomness_commitment_key(commitment),
            "Failed to delete randomness commitment cache entry",
        );
    }

    /// Replaces the accumulated uptime of `epoch`.
    fn write_accumulated_epoch_uptime(&self, epoch: u64, uptime: &Uptime) {
        put_or_fatal(
            self,
            &schema::uptime_key(epoch),
            &alloy_rlp::encode(uptime),
            "Failed to store updated uptime",
        );
    }

    /// Removes the accumulated uptime of `epoch`.
    fn delete_accumulated_epoch_uptime(&self, epoch: u64) {
        delete_or_fatal(self, &schema::uptime_key(epoch), "Failed to delete uptime");
    }
}

impl<T: KeyValueWriter + ?Sized> ConsensusWriter for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDb;
    use atlas_primitives::UptimeEntry;

    #[test]
    fn test_random_commitment_cache() {
        let db = MemoryDb::new();
        let commitment = B256::repeat_byte(0xaa);
        let parent = B256::repeat_byte(0xbb);

        assert_eq!(db.read_random_commitment_cache(commitment), None);
        db.write_random_commitment_cache(commitment, parent);
        assert_eq!(db.read_random_commitment_cache(commitment), Some(parent));
        assert_eq!(db.read_random_commitment_cache(parent), None);

        db.delete_random_commitment_cache(commitment);
        assert_eq!(db.read_random_commitment_cache(commitment), None);
    }

    #[test]
    fn test_accumulated_epoch_uptime() {
        let db = MemoryDb::new();
        let uptime = Uptime {
            entries: vec![
                UptimeEntry { score_tally: 12, last_signed_block: 100 },
                UptimeEntry { score_tally: 0, last_signed_block: 0 },
            ],
            latest_block: 101,
        };

        assert!(db.read_accumulated_epoch_uptime(3).is_none());
        db.write_accumulated_epoch_uptime(3, &uptime);
        assert_eq!(db.read_accumulated_epoch_uptime(3), Some(uptime));
        assert!(db.read_accumulated_epoch_uptime(4).is_none());

        db.delete_accumulated_epoch_uptime(3);
        assert!(db.read_accumulated_epoch_uptime(3).is_none());
    }

    #[test]
    fn test_corrupt_uptime_reads_as_missing() {
        let db = MemoryDb::new();
        db.put(&schema::uptime_key(1), &[0xc5, 0x01]).unwrap();
        assert!(db.read_accumulated_epoch_uptime(1).is_none());
    }
}
