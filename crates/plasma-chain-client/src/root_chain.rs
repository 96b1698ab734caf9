//! Root chain checkpoint contract over JSON-RPC.

use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall, SolValue};
use async_trait::async_trait;
use jsonrpsee::rpc_params;
use plasma_exit_core::HeaderBlockRange;
use serde_json::json;
use tracing::{debug, info};

use crate::rpc_types::RpcReceipt;
use crate::{ChainClientError, EthRpcClient, RootChain};

sol! {
    /// Checkpoint ledger of the root chain.
    interface IRootChain {
        /// Id of the last submitted header block.
        function currentHeaderBlock() external view returns (uint256 id);

        /// Last child block covered by the last submitted header block.
        function getLastChildBlock() external view returns (uint256 blockNumber);

        /// A submitted header block.
        function headerBlocks(uint256 id) external view returns (
            bytes32 root,
            uint256 start,
            uint256 end,
            uint256 createdAt,
            address proposer
        );

        /// Submit a checkpoint signed by the validators.
        function submitHeaderBlock(bytes data, bytes sigs) external;
    }
}

/// Default interval between receipt polls of a submission
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default number of receipt polls before a submission is given up
pub const MAX_RECEIPT_POLLS: u32 = 60;

/// ABI-encode the checkpoint data that validators sign and the root chain
/// stores: `(proposer, start, end, root, accountHash, chainId)`.
pub fn encode_checkpoint_data(
    proposer: Address,
    start: u64,
    end: u64,
    root: B256,
    account_hash: B256,
    chain_id: u64,
) -> Bytes {
    (
        proposer,
        U256::from(start),
        U256::from(end),
        root,
        account_hash,
        U256::from(chain_id),
    )
        .abi_encode_params()
        .into()
}

/// Client of the root chain contract holding the checkpoint ledger
#[derive(Debug, Clone)]
pub struct RootChainClient {
    rpc: EthRpcClient,
    contract: Address,
    sender: Address,
    poll_interval: Duration,
    max_polls: u32,
}

impl RootChainClient {
    /// Create a client for `contract`, submitting transactions from `sender`
    /// (an account unlocked on the node)
    pub fn new(rpc: EthRpcClient, contract: Address, sender: Address) -> Self {
        Self {
            rpc,
            contract,
            sender,
            poll_interval: RECEIPT_POLL_INTERVAL,
            max_polls: MAX_RECEIPT_POLLS,
        }
    }

    /// Override how submissions wait for their receipt
    pub fn with_receipt_polling(mut self, poll_interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_polls = max_polls;
        self
    }

    async fn call<C: SolCall + Send>(&self, call: C) -> Result<C::Return, ChainClientError> {
        let request = json!({
            "to": self.contract,
            "data": Bytes::from(call.abi_encode()),
        });
        let output: Bytes = self
            .rpc
            .request("eth_call", rpc_params![request, "latest"])
            .await?;
        C::abi_decode_returns(&output, true).map_err(|err| {
            ChainClientError::InvalidResponse(format!("{}: {}", C::SIGNATURE, err))
        })
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<RpcReceipt, ChainClientError> {
        for attempt in 1..=self.max_polls {
            let receipt: Option<RpcReceipt> = self
                .rpc
                .request("eth_getTransactionReceipt", rpc_params![tx_hash])
                .await?;
            if let Some(receipt) = receipt {
                return Ok(receipt);
            }
            debug!("Submission {} not mined yet (poll {})", tx_hash, attempt);
            tokio::time::sleep(self.poll_interval).await;
        }
        Err(ChainClientError::SubmissionTimeout {
            tx_hash,
            attempts: self.max_polls,
        })
    }
}

fn to_u64(value: U256, field: &str) -> Result<u64, ChainClientError> {
    u64::try_from(value)
        .map_err(|_| ChainClientError::InvalidResponse(format!("{field} {value} overflows u64")))
}

#[async_trait]
impl RootChain for RootChainClient {
    async fn current_header_block(&self) -> Result<u64, ChainClientError> {
        let result = self
            .call(IRootChain::currentHeaderBlockCall {})
            .await?;
        to_u64(result.id, "currentHeaderBlock")
    }

    async fn get_last_child_block(&self) -> Result<u64, ChainClientError> {
        let result = self.call(IRootChain::getLastChildBlockCall {}).await?;
        to_u64(result.blockNumber, "getLastChildBlock")
    }

    async fn header_blocks(&self, id: u64) -> Result<HeaderBlockRange, ChainClientError> {
        let result = self
            .call(IRootChain::headerBlocksCall { id: U256::from(id) })
            .await?;
        Ok(HeaderBlockRange {
            id,
            root: result.root,
            start: to_u64(result.start, "start")?,
            end: to_u64(result.end, "end")?,
            created_at: to_u64(result.createdAt, "createdAt")?,
            proposer: result.proposer,
        })
    }

    async fn submit_header_block(
        &self,
        data: Bytes,
        signatures: Bytes,
    ) -> Result<u64, ChainClientError> {
        let call = IRootChain::submitHeaderBlockCall {
            data,
            sigs: signatures,
        };
        let tx = json!({
            "from": self.sender,
            "to": self.contract,
            "data": Bytes::from(call.abi_encode()),
        });
        let tx_hash: B256 = self
            .rpc
            .request("eth_sendTransaction", rpc_params![tx])
            .await?;
        info!("Submitted header block in transaction {}", tx_hash);

        let receipt = self.wait_for_receipt(tx_hash).await?;
        if receipt.status.is_some_and(|status| status.is_zero()) {
            return Err(ChainClientError::SubmissionReverted(tx_hash));
        }

        let id = self.current_header_block().await?;
        info!("Header block {} mined in block {}", id, receipt.block_number);
        Ok(id)
    }
}
