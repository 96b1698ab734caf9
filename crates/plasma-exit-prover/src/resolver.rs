//! Locate the header block that committed a child block.
//!
//! Header block ids are multiples of the checkpoint interval and their block
//! ranges partition the child chain in increasing order, so the ledger is
//! binary-searched over `id / interval`.

use plasma_chain_client::RootChain;
use plasma_exit_core::HeaderBlockRange;
use tracing::{debug, info};

use crate::ProverError;

/// Find the header block whose range contains `block_number`.
///
/// - `root_chain`: checkpoint ledger to read
/// - `block_number`: child block, in root-chain numbering
/// - `interval`: spacing of header block ids
///
/// Fails with [`ProverError::BlockNotCheckpointed`] when the block is past the
/// last checkpointed child block. Reads `headerBlocks` at most
/// `floor(log2 n) + 1` times for `n` submitted checkpoints.
pub async fn find_checkpoint(
    root_chain: &dyn RootChain,
    block_number: u64,
    interval: u64,
) -> Result<HeaderBlockRange, ProverError> {
    if interval == 0 {
        return Err(ProverError::InvalidConfig(
            "checkpoint_interval must be positive".to_string(),
        ));
    }

    let last_child_block = root_chain.get_last_child_block().await?;
    let current = root_chain.current_header_block().await?;
    if current == 0 || block_number > last_child_block {
        return Err(ProverError::BlockNotCheckpointed {
            block: block_number,
            last_child_block,
        });
    }

    let mut low = 1;
    let mut high = current / interval;
    while low <= high {
        let mid = low + (high - low) / 2;
        let range = root_chain.header_blocks(mid * interval).await?;
        debug!(
            "Header block {} covers {}..={}",
            range.id, range.start, range.end
        );
        if block_number < range.start {
            high = mid - 1;
        } else if block_number > range.end {
            low = mid + 1;
        } else {
            info!("Block {} is checkpointed in header block {}", block_number, range.id);
            return Ok(range);
        }
    }
    Err(ProverError::CheckpointNotFound(block_number))
}
