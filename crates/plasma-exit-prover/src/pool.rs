//! Bounded, ordered fetching of blocks and receipts.
//!
//! At most `concurrency` requests are in flight at a time. Results come back
//! in request order regardless of completion order, and the first failure
//! aborts the whole batch.

use std::ops::RangeInclusive;

use futures::{stream, StreamExt, TryStreamExt};
use plasma_chain_client::ChainDataSource;
use plasma_exit_core::{Block, TransactionReceipt};
use tracing::debug;

use crate::ProverError;

/// Fetch every block of `range`, ordered by number.
pub async fn fetch_blocks(
    source: &dyn ChainDataSource,
    range: RangeInclusive<u64>,
    concurrency: usize,
) -> Result<Vec<Block>, ProverError> {
    let (start, end) = (*range.start(), *range.end());
    if start > end {
        return Err(ProverError::InvertedRange { start, end });
    }
    debug!(
        "Fetching blocks {}..={} ({} in flight)",
        start,
        end,
        concurrency.max(1)
    );

    let blocks: Vec<Block> = stream::iter(range)
        .map(|number| source.get_block(number))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    for (position, block) in blocks.iter().enumerate() {
        let expected = start + position as u64;
        if block.number != expected {
            return Err(ProverError::NonMonotonicBlocks {
                position,
                expected,
                actual: block.number,
            });
        }
    }
    Ok(blocks)
}

/// Fetch the receipts of every transaction of `block`, ordered by
/// transaction index.
pub async fn fetch_receipts(
    source: &dyn ChainDataSource,
    block: &Block,
    concurrency: usize,
) -> Result<Vec<TransactionReceipt>, ProverError> {
    debug!(
        "Fetching {} receipts of block {}",
        block.transactions.len(),
        block.number
    );
    let receipts: Vec<TransactionReceipt> = stream::iter(&block.transactions)
        .map(|tx| source.get_transaction_receipt(tx.hash))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;
    Ok(receipts)
}
