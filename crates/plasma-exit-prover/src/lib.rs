//! Checkpoint and exit workflows of a Plasma child chain
//!
//! - [`CheckpointOrchestrator`] commits ranges of child blocks to the root
//!   chain, keeping its [`CheckpointSession`] in sequence with the ledger.
//! - [`ExitBuilder`] turns a child-chain transaction into an exit or
//!   challenge payload once its block is checkpointed.
//!
//! Chain data is fetched through a bounded pool (see [`pool`]).

pub mod checkpoint;
pub mod config;
mod error;
pub mod exit;
pub mod pool;
pub mod resolver;

pub use checkpoint::{
    block_inclusion_proof, checkpoint_leaves, CheckpointOrchestrator, CheckpointSession,
    SubmittedCheckpoint,
};
pub use config::{ProposerConfig, ProverConfig};
pub use error::ProverError;
pub use exit::ExitBuilder;
pub use pool::{fetch_blocks, fetch_receipts};
pub use resolver::find_checkpoint;
