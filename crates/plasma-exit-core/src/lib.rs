//! Proof construction and verification for Plasma exits
//!
//! This crate holds the synchronous core shared by the prover workflows:
//! the child-chain data model, the block header codec, the checkpoint Merkle
//! tree, Merkle-Patricia trie proofs for transactions and receipts, and the
//! canonical exit/challenge payload encoding consumed by the root chain.

pub mod checkpoint;
pub mod encoding;
pub mod error;
pub mod header;
pub mod payload;
pub mod trie;
pub mod types;
pub mod verification;

#[cfg(test)]
mod test_utils;

pub use checkpoint::{
    concat_proof, verify_concatenated_proof, verify_merkle_proof, CheckpointTree, LeafPadding,
    MAX_TREE_DEPTH,
};
pub use error::{ProofError, ProofResult};
pub use header::{block_header_digest, header_digest};
pub use payload::{
    encode_challenge_payload, encode_exit_payload, verify_exit_reference, ExitPayload,
    ExitReference,
};
pub use trie::{receipt_proof, transaction_proof, verify_trie_proof, PatriciaTrie, TrieProof};
pub use types::{Block, HeaderBlockRange, LogEntry, Transaction, TransactionReceipt};
pub use verification::{RejectReason, Verification};
