use alloy_primitives::B256;
use thiserror::Error;

/// Error types for chain client operations
#[derive(Error, Debug)]
pub enum ChainClientError {
    /// RPC client errors
    #[error("RPC client error: {0}")]
    RpcClient(#[from] jsonrpsee::core::client::Error),
    /// Invalid HTTP header value
    #[error("Invalid HTTP header value")]
    InvalidHeader,
    /// The node does not know a block with this number
    #[error("Block {0} not found")]
    BlockNotFound(u64),
    /// The node does not know a block with this hash
    #[error("Block {0} not found")]
    BlockHashNotFound(B256),
    /// The node has no receipt for this transaction
    #[error("Receipt for transaction {0} not found")]
    ReceiptNotFound(B256),
    /// The node answered with data that cannot be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// The header block submission was mined but reverted
    #[error("Header block submission {0} reverted")]
    SubmissionReverted(B256),
    /// The header block submission was not mined in time
    #[error("No receipt for header block submission {tx_hash} after {attempts} polls")]
    SubmissionTimeout { tx_hash: B256, attempts: u32 },
    /// The checkpoint signer failed
    #[error("Signer error: {0}")]
    Signer(String),
}
