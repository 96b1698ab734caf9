use alloy_primitives::B256;
use plasma_chain_client::ChainClientError;
use plasma_exit_core::{ProofError, RejectReason};
use thiserror::Error;

/// Error types for the checkpoint and exit workflows
#[derive(Error, Debug)]
pub enum ProverError {
    /// Structural error while building a tree, trie or encoding
    #[error("Proof construction failed: {0}")]
    Proof(#[from] ProofError),
    /// Chain data could not be fetched or the root chain could not be reached
    #[error("Chain client error: {0}")]
    ChainClient(#[from] ChainClientError),
    /// The block is past the last checkpointed child block
    #[error("Block {block} is not checkpointed yet (last checkpointed block is {last_child_block})")]
    BlockNotCheckpointed { block: u64, last_child_block: u64 },
    /// The checkpoint ledger has no header block containing a checkpointed block
    #[error("No header block contains block {0}")]
    CheckpointNotFound(u64),
    /// A checkpoint rebuilt from chain data does not match the committed root
    #[error("Header block {id} commits to {committed}, chain data produces {computed}")]
    CheckpointRootMismatch {
        id: u64,
        committed: B256,
        computed: B256,
    },
    /// The requested checkpoint range is empty
    #[error("Checkpoint range is inverted: start {start} > end {end}")]
    InvertedRange { start: u64, end: u64 },
    /// The data source returned blocks out of sequence
    #[error("Expected block {expected} at position {position}, got block {actual}")]
    NonMonotonicBlocks {
        position: usize,
        expected: u64,
        actual: u64,
    },
    /// The checkpoint does not continue the root chain's last child block
    #[error("Checkpoint must start at child block {expected}, got {actual}")]
    RangeDiscontinuity { expected: u64, actual: u64 },
    /// A local block number is below the session offset
    #[error("Block {block} precedes the session block offset {offset}")]
    BlockBeforeOffset { block: u64, offset: u64 },
    /// The exit refers to a log the receipt does not have
    #[error("Log index {log_index} out of range, receipt has {count} logs")]
    LogIndexOutOfRange { log_index: u64, count: usize },
    /// A freshly built exit failed its own verification
    #[error("Built exit proof was rejected: {0:?}")]
    ProofRejected(RejectReason),
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProverError {
    /// Whether the error only means the block has not been checkpointed yet
    pub fn is_not_checkpointed(&self) -> bool {
        matches!(self, ProverError::BlockNotCheckpointed { .. })
    }
}
