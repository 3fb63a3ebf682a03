//! Reattaches block context to receipts and logs loaded from storage.
//!
//! Stored receipts only carry consensus fields. Everything else is recomputed
//! from the block they belong to. A block may carry one receipt more than it
//! has transactions: the receipt of the epoch finalization, which is not
//! backed by a transaction and is attributed to the block itself.

use crate::DeriveError;
use alloy_primitives::B256;
use atlas_primitives::{Log, Receipt, Transaction};

/// Returns the transaction hash each receipt is attributed to, or an error if
/// the receipt count does not fit the transactions.
fn attributed_hashes(
    receipts: usize,
    block_hash: B256,
    transactions: &[Transaction],
) -> Result<impl Iterator<Item = B256> + '_, DeriveError> {
    let count = transactions.len();
    if receipts != count && receipts != count + 1 {
        return Err(DeriveError::CountMismatch { transactions: count, receipts });
    }
    let finalization = (receipts > count).then_some(block_hash);
    Ok(transactions.iter().map(Transaction::hash).chain(finalization))
}

/// Fills the block context of every log in `logs`, one entry per receipt.
///
/// Log indices run across the whole block.
pub fn derive_log_fields(
    logs: &mut [Vec<Log>],
    block_hash: B256,
    block_number: u64,
    transactions: &[Transaction],
) -> Result<(), DeriveError> {
    let hashes = attributed_hashes(logs.len(), block_hash, transactions)?;

    let mut index = 0;
    for ((tx_index, receipt_logs), tx_hash) in logs.iter_mut().enumerate().zip(hashes) {
        for log in receipt_logs {
            log.block_number = block_number;
            log.block_hash = block_hash;
            log.tx_hash = tx_hash;
            log.tx_index = tx_index as u64;
            log.index = index;
            index += 1;
        }
    }
    Ok(())
}

/// Fills the block context of `receipts` and of their logs.
///
/// The gas used by each receipt is the step in cumulative gas from the
/// previous receipt.
pub fn derive_receipt_fields(
    receipts: &mut [Receipt],
    block_hash: B256,
    block_number: u64,
    transactions: &[Transaction],
) -> Result<(), DeriveError> {
    let hashes = attributed_hashes(receipts.len(), block_hash, transactions)?;

    let mut cumulative = 0;
    let mut log_index = 0;
    for ((tx_index, receipt), tx_hash) in receipts.iter_mut().enumerate().zip(hashes) {
        receipt.tx_hash = tx_hash;
        receipt.block_hash = block_hash;
        receipt.block_number = block_number;
        receipt.transaction_index = tx_index as u64;
        receipt.gas_used = receipt.cumulative_gas_used.saturating_sub(cumulative);
        cumulative = receipt.cumulative_gas_used;

        for log in &mut receipt.logs {
            log.block_number = block_number;
            log.block_hash = block_hash;
            log.tx_hash = tx_hash;
            log.tx_index = tx_index as u64;
            log.index = log_index;
            log_index += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes};
    use atlas_primitives::ReceiptStatus;
    use rstest::rstest;

    fn transactions(count: u64) -> Vec<Transaction> {
        (0..count).map(|nonce| Transaction { nonce, ..Default::default() }).collect()
    }

    fn log(seed: u8) -> Log {
        Log {
            address: Address::repeat_byte(seed),
            data: Bytes::from(vec![seed]),
            ..Default::default()
        }
    }

    fn receipts(count: usize) -> Vec<Receipt> {
        (0..count)
            .map(|i| {
                Receipt::new(ReceiptStatus::Successful, 21_000 * (i as u64 + 1), vec![log(i as u8); 2])
            })
            .collect()
    }

    #[rstest]
    #[case::one_per_transaction(3, 3, true)]
    #[case::with_finalization(3, 4, true)]
    #[case::empty_block(0, 0, true)]
    #[case::finalization_only(0, 1, true)]
    #[case::too_many(3, 5, false)]
    #[case::too_few(3, 2, false)]
    fn test_receipt_count_validation(
        #[case] txs: u64,
        #[case] count: usize,
        #[case] accepted: bool,
    ) {
        let txs = transactions(txs);
        let mut receipts = receipts(count);
        let result = derive_receipt_fields(&mut receipts, B256::repeat_byte(1), 5, &txs);
        assert_eq!(result.is_ok(), accepted);

        let mut logs: Vec<_> = receipts.into_iter().map(|r| r.logs).collect();
        let result = derive_log_fields(&mut logs, B256::repeat_byte(1), 5, &txs);
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert_eq!(
                result.unwrap_err(),
                DeriveError::CountMismatch { transactions: txs.len(), receipts: count }
            );
        }
    }

    #[test]
    fn test_receipt_fields() {
        let txs = transactions(2);
        let block_hash = B256::repeat_byte(0xbb);
        let mut receipts = receipts(3);

        derive_receipt_fields(&mut receipts, block_hash, 77, &txs).unwrap();

        for (i, receipt) in receipts.iter().enumerate() {
            assert_eq!(receipt.block_hash, block_hash);
            assert_eq!(receipt.block_number, 77);
            assert_eq!(receipt.transaction_index, i as u64);
            assert_eq!(receipt.gas_used, 21_000);
        }
        assert_eq!(receipts[0].tx_hash, txs[0].hash());
        assert_eq!(receipts[1].tx_hash, txs[1].hash());
        assert_eq!(receipts[2].tx_hash, block_hash);

        let indices: Vec<_> = receipts.iter().flat_map(|r| &r.logs).map(|l| l.index).collect();
        assert_eq!(indices, (0..6).collect::<Vec<_>>());
        assert!(receipts[2].logs.iter().all(|l| l.tx_index == 2 && l.tx_hash == block_hash));
    }

    #[test]
    fn test_log_fields() {
        let txs = transactions(2);
        let block_hash = B256::repeat_byte(0xcc);
        let mut logs = vec![vec![log(1)], vec![], vec![log(2), log(3)]];

        derive_log_fields(&mut logs, block_hash, 9, &txs).unwrap();

        assert_eq!(logs[0][0].tx_hash, txs[0].hash());
        assert_eq!((logs[0][0].tx_index, logs[0][0].index), (0, 0));
        assert_eq!((logs[2][0].tx_index, logs[2][0].index), (2, 1));
        assert_eq!((logs[2][1].tx_index, logs[2][1].index), (2, 2));
        assert!(logs[2].iter().all(|l| l.tx_hash == block_hash && l.block_number == 9));
        assert!(logs.iter().flatten().all(|l| l.block_hash == block_hash && !l.removed));
    }
}
