//! Structural errors raised while building proofs and encodings.
//!
//! These signal wrong inputs: a proof requested for a leaf that is not in the
//! tree, a transaction that cannot be re-encoded, or inconsistent block data.
//! Proof *rejection* is not an error, see [`crate::Verification`].

use alloy_primitives::{Bytes, B256};
use thiserror::Error;

/// A [Result] type alias where the error is [`ProofError`].
pub type ProofResult<T> = Result<T, ProofError>;

/// An error type for proof construction and encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// A checkpoint tree needs at least one leaf.
    #[error("Checkpoint tree needs at least one leaf")]
    EmptyTree,
    /// The checkpoint tree would exceed the maximum supported depth.
    #[error("Checkpoint tree depth {depth} exceeds the maximum of {max}")]
    TreeTooDeep { depth: usize, max: usize },
    /// The requested header digest is not a leaf of the tree.
    #[error("Leaf {0} not found in checkpoint tree")]
    LeafNotFound(B256),
    /// A proof was requested for a position past the last real leaf.
    #[error("Leaf index {index} out of range for {leaf_count} leaves")]
    LeafIndexOutOfRange { index: usize, leaf_count: usize },
    /// The requested key has no value in the trie.
    #[error("Key 0x{} does not exist in trie", hex::encode(.0))]
    KeyNotFound(Bytes),
    /// The trie rebuilt from the block's siblings does not match the block's root.
    #[error("Trie root mismatch: block commits to {expected}, siblings produce {computed}")]
    RootMismatch { expected: B256, computed: B256 },
    /// A block's transaction list is not indexed by position.
    #[error("Transaction at position {position} carries index {index}")]
    TransactionIndexMismatch { position: usize, index: u64 },
    /// Only legacy signed transactions can be re-encoded.
    #[error("Unsupported transaction type {0}")]
    UnsupportedTransactionType(u8),
    /// The `v` value of a legacy signature is neither 27/28 nor EIP-155.
    #[error("Transaction {hash} has unrecoverable signature v {v}")]
    InvalidSignature { hash: B256, v: u64 },
    /// The gas price does not fit the 128 bits a legacy transaction encodes.
    #[error("Gas price of transaction {0} exceeds 128 bits")]
    GasPriceOverflow(B256),
    /// A receipt bloom filter that is not 256 bytes long.
    #[error("Receipt for transaction {hash} has a {len}-byte logs bloom")]
    InvalidLogsBloom { hash: B256, len: usize },
    /// A receipt carries neither a status nor a post-state root.
    #[error("Receipt for transaction {0} has neither status nor post-state root")]
    MissingReceiptStatus(B256),
}

