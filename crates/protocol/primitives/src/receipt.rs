//! Transaction receipts and their storage encoding.

use crate::{Log, StoredLog};
use alloc::vec::Vec;
use alloy_primitives::{B256, Bloom, Bytes};
use alloy_rlp::{RlpDecodable, RlpEncodable};

const RECEIPT_STATUS_SUCCESSFUL: u8 = 0x01;

/// Outcome of a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReceiptStatus {
    /// Pre-Byzantium intermediate state root.
    PostState(B256),
    /// The transaction reverted.
    Failed,
    /// The transaction succeeded.
    #[default]
    Successful,
}

impl ReceiptStatus {
    /// Encodes the status the way it is persisted: the 32 byte root, an empty
    /// string for failure, or `0x01` for success.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::PostState(root) => Bytes::copy_from_slice(root.as_slice()),
            Self::Failed => Bytes::new(),
            Self::Successful => Bytes::from_static(&[RECEIPT_STATUS_SUCCESSFUL]),
        }
    }

    /// Decodes a persisted status.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, alloy_rlp::Error> {
        match bytes {
            [] => Ok(Self::Failed),
            [RECEIPT_STATUS_SUCCESSFUL] => Ok(Self::Successful),
            root if root.len() == 32 => Ok(Self::PostState(B256::from_slice(root))),
            _ => Err(alloy_rlp::Error::Custom("invalid receipt status")),
        }
    }

    /// Returns true if the transaction did not revert.
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// A transaction receipt.
///
/// Everything after `logs` is context derived from the block body when the
/// receipt is read back and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Receipt {
    /// Post state root or execution status.
    pub status: ReceiptStatus,
    /// Gas used by the block up to and including this transaction.
    pub cumulative_gas_used: u64,
    /// Bloom filter over [`Receipt::logs`].
    pub bloom: Bloom,
    /// Logs emitted by the transaction.
    pub logs: Vec<Log>,
    /// Hash of the transaction, or of the block for the finalization receipt.
    pub tx_hash: B256,
    /// Hash of the including block.
    pub block_hash: B256,
    /// Height of the including block.
    pub block_number: u64,
    /// Index of the transaction in the block.
    pub transaction_index: u64,
    /// Gas used by this transaction alone.
    pub gas_used: u64,
}

impl Receipt {
    /// Creates a receipt from its consensus fields, computing the bloom.
    pub fn new(status: ReceiptStatus, cumulative_gas_used: u64, logs: Vec<Log>) -> Self {
        let bloom = logs_bloom(&logs);
        Self { status, cumulative_gas_used, bloom, logs, ..Default::default() }
    }
}

/// Computes the bloom filter over a set of logs.
fn logs_bloom(logs: &[Log]) -> Bloom {
    let mut bloom = Bloom::ZERO;
    for log in logs {
        bloom.accrue_raw_log(log.address, &log.topics);
    }
    bloom
}

/// The persisted form of a [`Receipt`].
///
/// Omits the bloom, which is recomputed from the logs on decode, and every
/// field that can be derived from the block body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
pub struct StoredReceipt {
    /// Encoded [`ReceiptStatus`].
    pub post_state_or_status: Bytes,
    /// Cumulative gas used.
    pub cumulative_gas_used: u64,
    /// Persisted logs.
    pub logs: Vec<StoredLog>,
}

impl From<&Receipt> for StoredReceipt {
    fn from(receipt: &Receipt) -> Self {
        Self {
            post_state_or_status: receipt.status.to_bytes(),
            cumulative_gas_used: receipt.cumulative_gas_used,
            logs: receipt.logs.iter().map(Log::to_stored).collect(),
        }
    }
}

impl TryFrom<StoredReceipt> for Receipt {
    type Error = alloy_rlp::Error;

    fn try_from(stored: StoredReceipt) -> Result<Self, Self::Error> {
        let status = ReceiptStatus::from_bytes(&stored.post_state_or_status)?;
        let logs = stored.logs.into_iter().map(Log::from).collect();
        Ok(Self::new(status, stored.cumulative_gas_used, logs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use rstest::rstest;

    #[rstest]
    #[case::failed(ReceiptStatus::Failed, &[])]
    #[case::successful(ReceiptStatus::Successful, &[0x01])]
    #[case::post_state(ReceiptStatus::PostState(B256::repeat_byte(0x33)), &[0x33; 32])]
    fn test_status_encoding(#[case] status: ReceiptStatus, #[case] expected: &[u8]) {
        assert_eq!(status.to_bytes().as_ref(), expected);
        assert_eq!(ReceiptStatus::from_bytes(expected).unwrap(), status);
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!(ReceiptStatus::from_bytes(&[0x02]).is_err());
        assert!(ReceiptStatus::from_bytes(&[0u8; 31]).is_err());
    }

    #[test]
    fn test_storage_form_drops_context_and_restores_bloom() {
        let log = Log {
            address: Address::repeat_byte(0x10),
            topics: vec![B256::repeat_byte(0x20)],
            data: Bytes::from_static(b"payload"),
            block_number: 77,
            tx_hash: B256::repeat_byte(0x30),
            ..Default::default()
        };
        let mut receipt = Receipt::new(ReceiptStatus::Successful, 50_000, vec![log]);
        receipt.block_number = 77;
        receipt.gas_used = 50_000;

        let stored = StoredReceipt::from(&receipt);
        let decoded: StoredReceipt = alloy_rlp::decode_exact(alloy_rlp::encode(&stored)).unwrap();
        let restored = Receipt::try_from(decoded).unwrap();

        assert_eq!(restored.status, receipt.status);
        assert_eq!(restored.cumulative_gas_used, 50_000);
        assert_eq!(restored.bloom, receipt.bloom);
        assert_ne!(restored.bloom, Bloom::ZERO);
        assert_eq!(restored.logs[0].address, Address::repeat_byte(0x10));
        assert_eq!(restored.logs[0].block_number, 0);
        assert_eq!(restored.block_number, 0);
    }
}
