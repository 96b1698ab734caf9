//! Transactions and receipts tries built with alloy's hash builder, used to
//! extract inclusion proofs.

use std::collections::BTreeMap;

use alloy_primitives::{Bytes, B256};
use alloy_trie::proof::{ProofNodes, ProofRetainer};
use alloy_trie::{HashBuilder, Nibbles};
use tracing::debug;

use super::TrieProof;
use crate::encoding::{receipt_bytes, rlp_index, tx_bytes};
use crate::error::{ProofError, ProofResult};
use crate::types::{Block, TransactionReceipt};

/// Nodes at least this long are referenced by hash, shorter ones are embedded
/// in their parent.
const HASHED_NODE_LEN: usize = 32;

/// Merkle-Patricia trie keyed by `RLP(transactionIndex)`.
///
/// Entries are kept sorted by key nibbles, the order the hash builder consumes
/// them in. No RLP-encoded index is a prefix of another, so no value ever sits
/// on a branch.
#[derive(Debug, Clone, Default)]
pub struct PatriciaTrie {
    entries: BTreeMap<Nibbles, Bytes>,
}

impl PatriciaTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value stored for transaction `index`.
    pub fn insert(&mut self, index: u64, value: impl Into<Bytes>) {
        self.entries
            .insert(Nibbles::unpack(rlp_index(index)), value.into());
    }

    pub fn get(&self, index: u64) -> Option<&Bytes> {
        self.entries.get(&Nibbles::unpack(rlp_index(index)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Root hash, the empty trie root when nothing was inserted.
    pub fn root_hash(&self) -> B256 {
        self.build(None).0
    }

    fn build(&self, target: Option<&Nibbles>) -> (B256, ProofNodes) {
        let mut builder = HashBuilder::default();
        if let Some(target) = target {
            builder = builder.with_proof_retainer(ProofRetainer::new(vec![target.clone()]));
        }
        for (key, value) in &self.entries {
            builder.add_leaf(key.clone(), value);
        }
        let root = builder.root();
        (root, builder.take_proof_nodes())
    }

    /// Value stored for `index` with the nodes linking it to the root, from the
    /// root down.
    ///
    /// Only the root and hash-referenced nodes are listed; an embedded node is
    /// already committed to by the node that carries it.
    pub fn find_path(&self, index: u64) -> ProofResult<(&Bytes, Vec<Bytes>)> {
        let key = Nibbles::unpack(rlp_index(index));
        let value = self
            .entries
            .get(&key)
            .ok_or_else(|| ProofError::KeyNotFound(rlp_index(index)))?;

        let (_, proof_nodes) = self.build(Some(&key));
        let parent_nodes = proof_nodes
            .matching_nodes_sorted(&key)
            .into_iter()
            .filter(|(path, node)| path.is_empty() || node.len() >= HASHED_NODE_LEN)
            .map(|(_, node)| node)
            .collect();
        Ok((value, parent_nodes))
    }

    /// Build an inclusion proof for `index`, stamped with the root and `block_hash`.
    pub fn prove(&self, index: u64, block_hash: B256) -> ProofResult<TrieProof> {
        let (value, parent_nodes) = self.find_path(index)?;
        Ok(TrieProof {
            key: rlp_index(index),
            value: value.clone(),
            parent_nodes,
            root: self.root_hash(),
            block_hash,
        })
    }
}

/// Build the transactions trie of `block`, check it reproduces the block's
/// transactions root, and prove the transaction at `index`.
pub fn transaction_proof(block: &Block, index: u64) -> ProofResult<TrieProof> {
    block.ensure_indexed()?;

    let mut trie = PatriciaTrie::new();
    for tx in &block.transactions {
        trie.insert(tx.transaction_index, tx_bytes(tx)?);
    }
    check_root(block.transactions_root, trie.root_hash())?;

    debug!(
        "Built transactions trie of block {} over {} transactions",
        block.number,
        trie.len()
    );
    trie.prove(index, block.hash)
}

/// Build the receipts trie of `block`, check it reproduces the block's receipts
/// root, and prove the receipt at `index`.
///
/// `receipts` must be ordered by transaction index.
pub fn receipt_proof(
    block: &Block,
    receipts: &[TransactionReceipt],
    index: u64,
) -> ProofResult<TrieProof> {
    let mut trie = PatriciaTrie::new();
    for (position, receipt) in receipts.iter().enumerate() {
        if receipt.transaction_index != position as u64 {
            return Err(ProofError::TransactionIndexMismatch {
                position,
                index: receipt.transaction_index,
            });
        }
        trie.insert(receipt.transaction_index, receipt_bytes(receipt)?);
    }
    check_root(block.receipts_root, trie.root_hash())?;

    debug!(
        "Built receipts trie of block {} over {} receipts",
        block.number,
        trie.len()
    );
    trie.prove(index, block.hash)
}

fn check_root(expected: B256, computed: B256) -> ProofResult<()> {
    if expected != computed {
        return Err(ProofError::RootMismatch { expected, computed });
    }
    Ok(())
}
