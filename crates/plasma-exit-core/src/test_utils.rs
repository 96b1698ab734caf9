//! Synthetic blocks with consistent trie roots.

use alloy_primitives::{Address, Bytes, B256, U256};

use crate::encoding::{receipt_bytes, tx_bytes};
use crate::trie::PatriciaTrie;
use crate::types::{Block, LogEntry, Transaction, TransactionReceipt};

pub(crate) fn legacy_tx(block_number: u64, index: u64) -> Transaction {
    Transaction {
        transaction_type: None,
        nonce: block_number * 100 + index,
        gas_price: U256::from(1_000_000_000u64),
        gas: 90_000,
        to: Some(Address::repeat_byte(0x70 + index as u8)),
        value: U256::from(index * 1_000),
        input: Bytes::from(vec![0xa9, 0x05, 0x9c, 0xbb, index as u8]),
        v: 27 + index % 2,
        r: U256::from(0xdead_0000u64 + index),
        s: U256::from(0xbeef_0000u64 + index),
        hash: B256::repeat_byte(0x10 + index as u8),
        block_hash: B256::repeat_byte(block_number as u8),
        block_number,
        transaction_index: index,
    }
}

pub(crate) fn receipt_for(tx: &Transaction) -> TransactionReceipt {
    TransactionReceipt {
        block_hash: tx.block_hash,
        block_number: tx.block_number,
        transaction_hash: tx.hash,
        transaction_index: tx.transaction_index,
        status: Some(tx.transaction_index % 3 != 2),
        root: None,
        cumulative_gas_used: 21_000 * (tx.transaction_index + 1),
        gas_used: 21_000,
        contract_address: None,
        logs: vec![LogEntry {
            address: Address::repeat_byte(0x99),
            topics: vec![B256::repeat_byte(0xdd), B256::left_padding_from(&[tx.nonce as u8])],
            data: Bytes::from(vec![tx.transaction_index as u8; 32]),
            log_index: 0,
            transaction_index: tx.transaction_index,
            block_hash: tx.block_hash,
            block_number: tx.block_number,
        }],
        logs_bloom: Bytes::from(vec![0u8; 256]),
    }
}

/// A block of `tx_count` transactions whose roots match its contents.
pub(crate) fn block_with(
    number: u64,
    timestamp: u64,
    tx_count: u64,
) -> (Block, Vec<TransactionReceipt>) {
    let transactions: Vec<Transaction> = (0..tx_count).map(|i| legacy_tx(number, i)).collect();
    let receipts: Vec<TransactionReceipt> = transactions.iter().map(receipt_for).collect();

    let mut tx_trie = PatriciaTrie::new();
    let mut receipt_trie = PatriciaTrie::new();
    for (tx, receipt) in transactions.iter().zip(&receipts) {
        tx_trie.insert(tx.transaction_index, tx_bytes(tx).unwrap());
        receipt_trie.insert(tx.transaction_index, receipt_bytes(receipt).unwrap());
    }

    let block = Block {
        number,
        hash: B256::repeat_byte(number as u8),
        parent_hash: B256::repeat_byte(number.wrapping_sub(1) as u8),
        timestamp,
        transactions_root: tx_trie.root_hash(),
        receipts_root: receipt_trie.root_hash(),
        transactions,
    };
    (block, receipts)
}
