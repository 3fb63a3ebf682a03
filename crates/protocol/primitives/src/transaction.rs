//! Signed legacy transactions.

use alloy_primitives::{B256, Bytes, TxKind, U256, keccak256};
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// A signed transaction as carried in a block body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Transaction {
    /// Sender nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: U256,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient, or [`TxKind::Create`] for contract creation.
    pub to: TxKind,
    /// Transferred value in wei.
    pub value: U256,
    /// Call data or init code.
    pub input: Bytes,
    /// Signature recovery id.
    pub v: u64,
    /// Signature `r` value.
    pub r: U256,
    /// Signature `s` value.
    pub s: U256,
}

impl Transaction {
    /// Returns the transaction hash: keccak256 of the RLP encoded transaction.
    pub fn hash(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }
}
