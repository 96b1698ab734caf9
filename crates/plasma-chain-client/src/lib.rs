//! Clients for the chains a Plasma exit touches.
//!
//! The child chain is read through [`ChainDataSource`], the checkpoint ledger
//! on the root chain through [`RootChain`]. Both have implementations over
//! Ethereum JSON-RPC with retry on transport failures.

mod data_source;
mod error;
pub mod root_chain;
pub mod rpc;
mod rpc_types;
mod traits;

pub use error::ChainClientError;
pub use root_chain::{encode_checkpoint_data, RootChainClient};
pub use rpc::{EthRpcClient, RpcConfig};
pub use rpc_types::{RpcBlock, RpcLog, RpcReceipt, RpcTransaction};
pub use traits::{ChainDataSource, CheckpointSigner, RootChain};
