//! A full block: header plus body.

use crate::{Body, EpochSnarkData, Header, Randomness, Transaction};
use alloc::vec::Vec;
use alloy_primitives::{B256, U256};

/// A block assembled from a header and its separately stored body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Block {
    /// The block header.
    pub header: Header,
    /// Transactions in execution order.
    pub transactions: Vec<Transaction>,
    /// Randomness beacon values.
    pub randomness: Randomness,
    /// Epoch snark data.
    pub epoch_snark_data: EpochSnarkData,
}

impl Block {
    /// Creates a block with the given header and an empty body.
    pub fn new_with_header(header: Header) -> Self {
        Self { header, ..Default::default() }
    }

    /// Replaces the body parts of the block.
    pub fn with_body(mut self, body: Body) -> Self {
        self.transactions = body.transactions;
        self.randomness = body.randomness;
        self.epoch_snark_data = body.epoch_snark_data;
        self
    }

    /// Returns the block hash.
    pub fn hash(&self) -> B256 {
        self.header.hash_slow()
    }

    /// Returns the block height.
    pub const fn number(&self) -> u64 {
        self.header.number
    }

    /// Returns the parent block hash.
    pub const fn parent_hash(&self) -> B256 {
        self.header.parent_hash
    }

    /// Returns a copy of the body parts of the block.
    pub fn body(&self) -> Body {
        Body {
            transactions: self.transactions.clone(),
            randomness: self.randomness,
            epoch_snark_data: self.epoch_snark_data.clone(),
        }
    }

    /// Returns the fork-choice weight contributed by this block.
    ///
    /// Istanbul finality gives every block the same weight, so the total
    /// difficulty of block `n` on a chain starting at genesis is `n + 1`.
    pub const fn difficulty(&self) -> U256 {
        U256::from_limbs([1, 0, 0, 0])
    }
}

impl From<(Header, Body)> for Block {
    fn from((header, body): (Header, Body)) -> Self {
        Self::new_with_header(header).with_body(body)
    }
}
