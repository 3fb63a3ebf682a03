//! The header lookups consensus verification needs from the chain.

use super::{CanonicalReader, HeaderReader};
use crate::ChainStoreReader;
use alloy_primitives::B256;
use atlas_primitives::Header;

/// Header access for consensus engines, resolved against the canonical chain.
pub trait ChainHeaderReader: ChainStoreReader {
    /// Returns the current canonical head header.
    fn current_header(&self) -> Option<Header> {
        self.read_head_header()
    }

    /// Returns the header `(number, hash)`.
    fn get_header(&self, hash: B256, number: u64) -> Option<Header> {
        self.read_header(hash, number)
    }

    /// Returns the canonical header at `number`.
    fn get_header_by_number(&self, number: u64) -> Option<Header> {
        let hash = self.read_canonical_hash(number)?;
        self.read_header(hash, number)
    }

    /// Returns the header with the given hash.
    fn get_header_by_hash(&self, hash: B256) -> Option<Header> {
        let number = self.read_header_number(hash)?;
        self.read_header(hash, number)
    }
}

impl<T: ChainStoreReader + ?Sized> ChainHeaderReader for T {}
