//! Checkpoint submission and block inclusion proofs.
//!
//! A [`CheckpointSession`] tracks the last child block this proposer
//! committed and the offset between local block numbers and the numbers the
//! root chain records (`root = local - offset`). Every check that can fail
//! runs before the root chain is written to, so a failed submission leaves
//! no trace on the root chain.

use std::ops::RangeInclusive;
use std::sync::Arc;

use alloy_primitives::{Bytes, B256};
use plasma_chain_client::{encode_checkpoint_data, ChainDataSource, CheckpointSigner, RootChain};
use plasma_exit_core::{
    header_digest, Block, CheckpointTree, HeaderBlockRange, ProofError, RejectReason,
    MAX_TREE_DEPTH,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ProposerConfig, ProverConfig};
use crate::pool::fetch_blocks;
use crate::ProverError;

/// Sequencing state of one checkpoint proposer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSession {
    last_end_block: Option<u64>,
    block_offset: u64,
}

impl CheckpointSession {
    pub fn new(block_offset: u64) -> Self {
        Self {
            last_end_block: None,
            block_offset,
        }
    }

    /// Last local block covered by a submitted checkpoint
    pub fn last_end_block(&self) -> Option<u64> {
        self.last_end_block
    }

    pub fn block_offset(&self) -> u64 {
        self.block_offset
    }

    /// First local block of the next checkpoint
    pub fn next_start(&self) -> u64 {
        self.last_end_block
            .map_or(self.block_offset, |end| end + 1)
    }

    /// Whether a submitted checkpoint already covers `local_block`
    pub fn covers(&self, local_block: u64) -> bool {
        self.last_end_block.is_some_and(|end| local_block <= end)
    }

    pub fn to_root_number(&self, local_block: u64) -> Result<u64, ProverError> {
        root_number(local_block, self.block_offset)
    }

    pub fn to_local_number(&self, root_block: u64) -> u64 {
        root_block + self.block_offset
    }
}

fn root_number(local_block: u64, offset: u64) -> Result<u64, ProverError> {
    local_block
        .checked_sub(offset)
        .ok_or(ProverError::BlockBeforeOffset {
            block: local_block,
            offset,
        })
}

/// A checkpoint accepted by the root chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedCheckpoint {
    /// Id of the new header block
    pub header_block_id: u64,
    /// First child block, root-chain numbering
    pub start: u64,
    /// Last child block, root-chain numbering
    pub end: u64,
    pub root: B256,
    /// Data the validators signed
    pub data: Bytes,
}

/// Builds checkpoints from child-chain blocks and submits them to the root chain.
pub struct CheckpointOrchestrator {
    source: Arc<dyn ChainDataSource>,
    root_chain: Arc<dyn RootChain>,
    signer: Arc<dyn CheckpointSigner>,
    config: ProverConfig,
    proposer: ProposerConfig,
    session: CheckpointSession,
}

impl CheckpointOrchestrator {
    pub fn new(
        source: Arc<dyn ChainDataSource>,
        root_chain: Arc<dyn RootChain>,
        signer: Arc<dyn CheckpointSigner>,
        config: ProverConfig,
        proposer: ProposerConfig,
        session: CheckpointSession,
    ) -> Result<Self, ProverError> {
        config.validate()?;
        Ok(Self {
            source,
            root_chain,
            signer,
            config,
            proposer,
            session,
        })
    }

    pub fn session(&self) -> &CheckpointSession {
        &self.session
    }

    /// Align the session with the checkpoints already on the root chain.
    /// Returns the first local block of the next checkpoint.
    pub async fn sync_session(&mut self) -> Result<u64, ProverError> {
        let current = self.root_chain.current_header_block().await?;
        self.session.last_end_block = if current == 0 {
            None
        } else {
            let last_child_block = self.root_chain.get_last_child_block().await?;
            Some(self.session.to_local_number(last_child_block))
        };
        let next = self.session.next_start();
        info!("Checkpoint session synced, next checkpoint starts at block {}", next);
        Ok(next)
    }

    /// Commit the blocks from the session's next start through `end` (local
    /// numbering) in a new header block.
    pub async fn submit_checkpoint(
        &mut self,
        end: u64,
    ) -> Result<SubmittedCheckpoint, ProverError> {
        let start = self.session.next_start();
        if start > end {
            return Err(ProverError::InvertedRange { start, end });
        }
        let root_start = self.session.to_root_number(start)?;
        let root_end = self.session.to_root_number(end)?;
        ensure_tree_fits(root_start, root_end)?;

        let expected = self.expected_start().await?;
        if root_start != expected {
            return Err(ProverError::RangeDiscontinuity {
                expected,
                actual: root_start,
            });
        }

        info!("Building checkpoint over blocks {}..={}", start, end);
        let tree = build_tree(
            self.source.as_ref(),
            start..=end,
            self.session.block_offset,
            &self.config,
        )
        .await?;
        let root = tree.root();
        debug!("Checkpoint root {} over {} blocks", root, tree.leaf_count());

        let data = encode_checkpoint_data(
            self.proposer.proposer,
            root_start,
            root_end,
            root,
            self.proposer.account_hash,
            self.proposer.chain_id,
        );
        let signatures = self.signer.sign(&data).await?;
        let header_block_id = self
            .root_chain
            .submit_header_block(data.clone(), signatures)
            .await?;

        self.session.last_end_block = Some(end);
        info!(
            "Header block {} commits blocks {}..={} with root {}",
            header_block_id, root_start, root_end, root
        );
        Ok(SubmittedCheckpoint {
            header_block_id,
            start: root_start,
            end: root_end,
            root,
            data,
        })
    }

    /// Submit the next checkpoint up through the block of `tx_hash`, unless a
    /// checkpoint already covers it.
    pub async fn submit_checkpoint_for_tx(
        &mut self,
        tx_hash: B256,
    ) -> Result<Option<SubmittedCheckpoint>, ProverError> {
        let receipt = self.source.get_transaction_receipt(tx_hash).await?;
        self.sync_session().await?;
        if self.session.covers(receipt.block_number) {
            info!(
                "Block {} of transaction {} is already checkpointed",
                receipt.block_number, tx_hash
            );
            return Ok(None);
        }
        self.submit_checkpoint(receipt.block_number).await.map(Some)
    }

    /// Root-chain number the next checkpoint must start at
    async fn expected_start(&self) -> Result<u64, ProverError> {
        if self.root_chain.current_header_block().await? == 0 {
            return Ok(0);
        }
        Ok(self.root_chain.get_last_child_block().await? + 1)
    }
}

/// Rebuild the tree of `checkpoint` from chain data and prove the header of
/// `block_number` (root-chain numbering) against the committed root.
pub async fn block_inclusion_proof(
    source: &dyn ChainDataSource,
    checkpoint: &HeaderBlockRange,
    block_number: u64,
    block_offset: u64,
    config: &ProverConfig,
) -> Result<Vec<B256>, ProverError> {
    let leaf_index = checkpoint
        .leaf_index(block_number)
        .ok_or(ProverError::ProofRejected(RejectReason::BlockOutsideCheckpoint))?;
    ensure_tree_fits(checkpoint.start, checkpoint.end)?;

    let local = (checkpoint.start + block_offset)..=(checkpoint.end + block_offset);
    let tree = build_tree(source, local, block_offset, config).await?;
    if tree.root() != checkpoint.root {
        return Err(ProverError::CheckpointRootMismatch {
            id: checkpoint.id,
            committed: checkpoint.root,
            computed: tree.root(),
        });
    }
    Ok(tree.proof_at(leaf_index)?)
}

/// Header digests of `blocks`, numbered as the root chain records them
pub fn checkpoint_leaves(blocks: &[Block], block_offset: u64) -> Result<Vec<B256>, ProverError> {
    blocks
        .iter()
        .map(|block| {
            Ok(header_digest(
                root_number(block.number, block_offset)?,
                block.timestamp,
                block.transactions_root,
                block.receipts_root,
            ))
        })
        .collect()
}

async fn build_tree(
    source: &dyn ChainDataSource,
    range: RangeInclusive<u64>,
    block_offset: u64,
    config: &ProverConfig,
) -> Result<CheckpointTree, ProverError> {
    let blocks = fetch_blocks(source, range, config.fetch_concurrency).await?;
    let leaves = checkpoint_leaves(&blocks, block_offset)?;
    Ok(CheckpointTree::new(leaves, config.leaf_padding)?)
}

fn ensure_tree_fits(start: u64, end: u64) -> Result<(), ProverError> {
    let count = end - start + 1;
    if count > 1u64 << MAX_TREE_DEPTH {
        let depth = count.next_power_of_two().trailing_zeros() as usize;
        return Err(ProofError::TreeTooDeep {
            depth,
            max: MAX_TREE_DEPTH,
        }
        .into());
    }
    Ok(())
}
