//! Exit and challenge payloads for a child-chain transaction.

use std::sync::Arc;

use alloy_primitives::{Bytes, B256};
use plasma_chain_client::{ChainDataSource, RootChain};
use plasma_exit_core::{
    encode_challenge_payload, encode_exit_payload, receipt_proof, transaction_proof,
    verify_exit_reference, ExitPayload, ExitReference, Verification,
};
use tracing::{debug, info};

use crate::checkpoint::block_inclusion_proof;
use crate::config::ProverConfig;
use crate::pool::fetch_receipts;
use crate::resolver::find_checkpoint;
use crate::ProverError;

/// Builds self-verified exit payloads from chain data and the checkpoint ledger.
pub struct ExitBuilder {
    source: Arc<dyn ChainDataSource>,
    root_chain: Arc<dyn RootChain>,
    config: ProverConfig,
    block_offset: u64,
}

impl ExitBuilder {
    pub fn new(
        source: Arc<dyn ChainDataSource>,
        root_chain: Arc<dyn RootChain>,
        config: ProverConfig,
    ) -> Result<Self, ProverError> {
        config.validate()?;
        Ok(Self {
            source,
            root_chain,
            config,
            block_offset: 0,
        })
    }

    /// Local block numbers are `block_offset` ahead of the root chain's
    pub fn with_block_offset(mut self, block_offset: u64) -> Self {
        self.block_offset = block_offset;
        self
    }

    /// Prove that log `log_index` of the receipt of `tx_hash` belongs to a
    /// checkpointed block.
    ///
    /// The payload is replayed against the committed checkpoint before it is
    /// returned.
    pub async fn build_exit(
        &self,
        tx_hash: B256,
        log_index: u64,
    ) -> Result<ExitPayload, ProverError> {
        let receipt = self.source.get_transaction_receipt(tx_hash).await?;
        if log_index >= receipt.logs.len() as u64 {
            return Err(ProverError::LogIndexOutOfRange {
                log_index,
                count: receipt.logs.len(),
            });
        }

        let block = self.source.get_block_by_hash(receipt.block_hash).await?;
        let receipts =
            fetch_receipts(self.source.as_ref(), &block, self.config.fetch_concurrency).await?;
        let index = receipt.transaction_index;
        let tx_proof = transaction_proof(&block, index)?;
        let receipt_proof = receipt_proof(&block, &receipts, index)?;
        debug!(
            "Built trie proofs for transaction {} of block {} ({} and {} nodes)",
            index,
            block.number,
            tx_proof.parent_nodes.len(),
            receipt_proof.parent_nodes.len()
        );

        let block_number = block
            .number
            .checked_sub(self.block_offset)
            .ok_or(ProverError::BlockBeforeOffset {
                block: block.number,
                offset: self.block_offset,
            })?;
        let checkpoint = find_checkpoint(
            self.root_chain.as_ref(),
            block_number,
            self.config.checkpoint_interval,
        )
        .await?;
        let header_proof = block_inclusion_proof(
            self.source.as_ref(),
            &checkpoint,
            block_number,
            self.block_offset,
            &self.config,
        )
        .await?;

        let payload = ExitPayload {
            header_block_id: checkpoint.id,
            block_number,
            block_timestamp: block.timestamp,
            reference: ExitReference {
                receipt: receipt_proof.value.clone(),
                tx: tx_proof.value.clone(),
                receipt_proof,
                tx_proof,
                transactions_root: block.transactions_root,
                receipts_root: block.receipts_root,
                header_proof,
            },
            log_index,
        };

        if let Verification::Rejected(reason) = verify_exit_reference(&payload, &checkpoint) {
            return Err(ProverError::ProofRejected(reason));
        }
        info!(
            "Exit for transaction {} proven against header block {}",
            tx_hash, checkpoint.id
        );
        Ok(payload)
    }

    /// Encoded exit payload for log `log_index` of `tx_hash`
    pub async fn exit_payload(&self, tx_hash: B256, log_index: u64) -> Result<Bytes, ProverError> {
        let payload = self.build_exit(tx_hash, log_index).await?;
        Ok(encode_exit_payload(&payload))
    }

    /// Encoded challenge payload, the exit payload extended with the
    /// transaction and its trie proof
    pub async fn challenge_payload(
        &self,
        tx_hash: B256,
        log_index: u64,
    ) -> Result<Bytes, ProverError> {
        let payload = self.build_exit(tx_hash, log_index).await?;
        Ok(encode_challenge_payload(&payload))
    }
}
