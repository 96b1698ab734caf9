//! Prover configuration.

use alloy_primitives::{Address, B256};
use plasma_exit_core::LeafPadding;
use serde::{Deserialize, Serialize};

use crate::ProverError;

/// Default spacing of header block ids on the root chain
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 10_000;

/// Default number of chain data requests in flight
pub const DEFAULT_FETCH_CONCURRENCY: usize = 10;

/// Parameters shared by the checkpoint and exit workflows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Header block ids are multiples of this value
    pub checkpoint_interval: u64,
    /// Maximum number of concurrent block/receipt fetches, 1 fetches sequentially
    pub fetch_concurrency: usize,
    /// How checkpoint trees complete odd levels
    pub leaf_padding: LeafPadding,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            leaf_padding: LeafPadding::default(),
        }
    }
}

impl ProverConfig {
    pub fn validate(&self) -> Result<(), ProverError> {
        if self.checkpoint_interval == 0 {
            return Err(ProverError::InvalidConfig(
                "checkpoint_interval must be positive".to_string(),
            ));
        }
        if self.fetch_concurrency == 0 {
            return Err(ProverError::InvalidConfig(
                "fetch_concurrency must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Identity under which checkpoints are proposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposerConfig {
    /// Address recorded as the checkpoint proposer
    pub proposer: Address,
    /// Child chain id
    pub chain_id: u64,
    /// Hash of the validator account state the checkpoint is signed over
    #[serde(default)]
    pub account_hash: B256,
}
