//! Block bodies and the consensus artifacts carried next to the transactions.

use crate::Transaction;
use alloc::vec::Vec;
use alloy_primitives::{B256, Bytes, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// The randomness beacon values revealed and committed by a block proposer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Randomness {
    /// Randomness revealed for the previous commitment.
    pub revealed: B256,
    /// Commitment to the randomness revealed in the proposer's next block.
    pub committed: B256,
}

/// Aggregated validator signature over the epoch transition, consumed by light clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpochSnarkData {
    /// Bitmap of the validators that signed.
    pub bitmap: U256,
    /// Aggregated BLS signature.
    pub signature: Bytes,
}

impl EpochSnarkData {
    /// Returns true if no epoch signature is attached.
    pub fn is_empty(&self) -> bool {
        self.signature.is_empty()
    }
}

/// The data of a block that is not part of the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Body {
    /// Transactions in execution order.
    pub transactions: Vec<Transaction>,
    /// Randomness beacon values.
    pub randomness: Randomness,
    /// Epoch snark data, empty for blocks that do not close an epoch.
    pub epoch_snark_data: EpochSnarkData,
}
