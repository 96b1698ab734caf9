//! Contracts of the external collaborators the prover talks to.

use alloy_primitives::{Bytes, B256};
use async_trait::async_trait;
use plasma_exit_core::{Block, HeaderBlockRange, TransactionReceipt};

use crate::ChainClientError;

/// Raw block, transaction and receipt data of a chain.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Get a block with its full transaction list by number
    async fn get_block(&self, number: u64) -> Result<Block, ChainClientError>;

    /// Get a block with its full transaction list by hash
    async fn get_block_by_hash(&self, hash: B256) -> Result<Block, ChainClientError>;

    /// Get the receipt of a mined transaction
    async fn get_transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<TransactionReceipt, ChainClientError>;
}

/// Read and write access to the checkpoint ledger held by the root chain.
#[async_trait]
pub trait RootChain: Send + Sync {
    /// Id of the last submitted header block, 0 when none was submitted
    async fn current_header_block(&self) -> Result<u64, ChainClientError>;

    /// Last child block covered by the last submitted header block
    async fn get_last_child_block(&self) -> Result<u64, ChainClientError>;

    /// Read a submitted header block
    async fn header_blocks(&self, id: u64) -> Result<HeaderBlockRange, ChainClientError>;

    /// Submit a checkpoint with its validator signatures, returning the id of
    /// the new header block
    async fn submit_header_block(
        &self,
        data: Bytes,
        signatures: Bytes,
    ) -> Result<u64, ChainClientError>;
}

/// Produces the validator signatures over checkpoint data.
#[async_trait]
pub trait CheckpointSigner: Send + Sync {
    async fn sign(&self, data: &[u8]) -> Result<Bytes, ChainClientError>;
}
