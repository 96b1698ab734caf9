//! Block header digests used as checkpoint tree leaves.

use alloy_primitives::{keccak256, B256, U256};

use crate::types::Block;

/// Compute the checkpoint leaf of a block:
/// `keccak256(number || timestamp || transactionsRoot || receiptsRoot)` where
/// number and timestamp are 32-byte big-endian words.
pub fn block_header_digest(block: &Block) -> B256 {
    header_digest(
        block.number,
        block.timestamp,
        block.transactions_root,
        block.receipts_root,
    )
}

/// Same as [`block_header_digest`] over explicit header fields.
pub fn header_digest(
    number: u64,
    timestamp: u64,
    transactions_root: B256,
    receipts_root: B256,
) -> B256 {
    let mut data = [0u8; 128];
    data[..32].copy_from_slice(&U256::from(number).to_be_bytes::<32>());
    data[32..64].copy_from_slice(&U256::from(timestamp).to_be_bytes::<32>());
    data[64..96].copy_from_slice(transactions_root.as_slice());
    data[96..].copy_from_slice(receipts_root.as_slice());
    keccak256(data)
}
