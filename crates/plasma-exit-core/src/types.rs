//! Child-chain data model consumed by the proof builders.
//!
//! All values are immutable snapshots fetched from a chain data source and
//! owned by whoever fetched them.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::error::{ProofError, ProofResult};

/// A child-chain block with its full transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Chain-local block number
    pub number: u64,
    /// Block hash
    pub hash: B256,
    /// Hash of the parent block
    pub parent_hash: B256,
    /// Block timestamp (UNIX seconds)
    pub timestamp: u64,
    /// Root of the transactions Patricia trie
    pub transactions_root: B256,
    /// Root of the receipts Patricia trie
    pub receipts_root: B256,
    /// Transactions ordered by their index in the block
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Check that `transactions[i].transaction_index == i` for every position.
    pub fn ensure_indexed(&self) -> ProofResult<()> {
        for (position, tx) in self.transactions.iter().enumerate() {
            if tx.transaction_index != position as u64 {
                return Err(ProofError::TransactionIndexMismatch {
                    position,
                    index: tx.transaction_index,
                });
            }
        }
        Ok(())
    }
}

/// A signed child-chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// EIP-2718 type byte, `None` for legacy transactions
    pub transaction_type: Option<u8>,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: u64,
    /// Recipient, `None` for contract creation
    pub to: Option<Address>,
    pub value: U256,
    /// Call data
    pub input: Bytes,
    pub v: u64,
    pub r: U256,
    pub s: U256,
    /// Transaction hash
    pub hash: B256,
    /// Hash of the block containing the transaction
    pub block_hash: B256,
    /// Number of the block containing the transaction
    pub block_number: u64,
    /// Position of the transaction in its block
    pub transaction_index: u64,
}

/// Execution receipt of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub block_hash: B256,
    pub block_number: u64,
    pub transaction_hash: B256,
    pub transaction_index: u64,
    /// Execution status, `None` on chains that predate status codes
    pub status: Option<bool>,
    /// Post-state root, present on chains that predate status codes
    pub root: Option<B256>,
    pub cumulative_gas_used: u64,
    pub gas_used: u64,
    /// Address of the created contract, if any
    pub contract_address: Option<Address>,
    pub logs: Vec<LogEntry>,
    /// 256-byte logs bloom filter
    pub logs_bloom: Bytes,
}

/// An event emitted during transaction execution.
///
/// Only `address`, `topics` and `data` are part of the receipt encoding; the
/// positional fields are used for event filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub log_index: u64,
    pub transaction_index: u64,
    pub block_hash: B256,
    pub block_number: u64,
}

/// A checkpoint ("header block") committed to the root chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlockRange {
    /// Header block id, always a multiple of the checkpoint interval
    pub id: u64,
    /// Root of the checkpoint Merkle tree
    pub root: B256,
    /// First child block covered (inclusive)
    pub start: u64,
    /// Last child block covered (inclusive)
    pub end: u64,
    /// Root-chain timestamp of the submission
    pub created_at: u64,
    /// Address that proposed the checkpoint
    pub proposer: Address,
}

impl HeaderBlockRange {
    pub fn contains(&self, block_number: u64) -> bool {
        self.start <= block_number && block_number <= self.end
    }

    /// Number of child blocks covered.
    pub fn block_count(&self) -> u64 {
        self.end.saturating_sub(self.start) + 1
    }

    /// Position of `block_number` among the checkpoint leaves.
    pub fn leaf_index(&self, block_number: u64) -> Option<usize> {
        self.contains(block_number)
            .then(|| (block_number - self.start) as usize)
    }
}
