//! Builders for chain fixtures.
//!
//! `salt` values let tests build distinct blocks at the same height.

use alloy_primitives::{Address, B256, Bytes, U256};
use atlas_primitives::{
    Block, Body, Header, Log, Randomness, Receipt, ReceiptStatus, Transaction,
};

/// Gas used by every fixture transaction.
pub const TX_GAS: u64 = 21_000;

/// Builds a header at `number` on top of `parent`.
pub fn header(number: u64, parent: B256, salt: u8) -> Header {
    Header {
        parent_hash: parent,
        coinbase: Address::repeat_byte(salt),
        number,
        time: 1_600_000_000 + number * 5,
        extra: Bytes::from(vec![salt]),
        ..Default::default()
    }
}

/// Builds a block at `number` on top of `parent` carrying `transactions`
/// transfer transactions.
pub fn block(number: u64, parent: B256, transactions: u64, salt: u8) -> Block {
    let mut header = header(number, parent, salt);
    header.gas_used = transactions * TX_GAS;

    let body = Body {
        transactions: (0..transactions)
            .map(|nonce| Transaction {
                nonce,
                gas_price: U256::from(1u64),
                gas_limit: TX_GAS,
                value: U256::from(number),
                input: Bytes::from(vec![salt]),
                ..Default::default()
            })
            .collect(),
        randomness: Randomness {
            revealed: B256::with_last_byte(salt),
            committed: B256::repeat_byte(salt),
        },
        ..Default::default()
    };
    Block::new_with_header(header).with_body(body)
}

/// Builds `count` linked blocks with one transaction each, on top of `parent`.
pub fn extend(parent: &Block, count: u64, salt: u8) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::with_capacity(count as usize);
    for number in parent.number() + 1..=parent.number() + count {
        let parent_hash = blocks.last().map_or_else(|| parent.hash(), Block::hash);
        blocks.push(block(number, parent_hash, 1, salt));
    }
    blocks
}

/// Builds a chain of `len` linked blocks from a genesis block, one transaction
/// per block.
pub fn chain(len: u64, salt: u8) -> Vec<Block> {
    if len == 0 {
        return Vec::new();
    }
    let genesis = block(0, B256::ZERO, 1, salt);
    let mut blocks = extend(&genesis, len - 1, salt);
    blocks.insert(0, genesis);
    blocks
}

/// Builds one successful receipt per transaction of `block`, each carrying
/// `logs` logs.
pub fn receipts(block: &Block, logs: usize) -> Vec<Receipt> {
    block
        .transactions
        .iter()
        .enumerate()
        .map(|(i, tx)| {
            let logs = (0..logs)
                .map(|j| Log {
                    address: Address::repeat_byte(i as u8),
                    topics: vec![tx.hash()],
                    data: Bytes::from(vec![j as u8]),
                    ..Default::default()
                })
                .collect();
            Receipt::new(ReceiptStatus::Successful, TX_GAS * (i as u64 + 1), logs)
        })
        .collect()
}
