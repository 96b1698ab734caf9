use alloy_primitives::{B256, U64};
use async_trait::async_trait;
use jsonrpsee::rpc_params;
use plasma_exit_core::{Block, TransactionReceipt};
use tracing::debug;

use crate::rpc_types::{RpcBlock, RpcReceipt};
use crate::{ChainClientError, ChainDataSource, EthRpcClient};

#[async_trait]
impl ChainDataSource for EthRpcClient {
    async fn get_block(&self, number: u64) -> Result<Block, ChainClientError> {
        let block: Option<RpcBlock> = self
            .request("eth_getBlockByNumber", rpc_params![U64::from(number), true])
            .await?;
        debug!("Fetched block {}", number);
        block
            .ok_or(ChainClientError::BlockNotFound(number))?
            .try_into()
    }

    async fn get_block_by_hash(&self, hash: B256) -> Result<Block, ChainClientError> {
        let block: Option<RpcBlock> = self
            .request("eth_getBlockByHash", rpc_params![hash, true])
            .await?;
        block
            .ok_or(ChainClientError::BlockHashNotFound(hash))?
            .try_into()
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<TransactionReceipt, ChainClientError> {
        let receipt: Option<RpcReceipt> = self
            .request("eth_getTransactionReceipt", rpc_params![tx_hash])
            .await?;
        receipt
            .map(Into::into)
            .ok_or(ChainClientError::ReceiptNotFound(tx_hash))
    }
}
