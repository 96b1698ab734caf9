//! Ethereum JSON-RPC response objects and their conversion into the core
//! data model. Quantities arrive as hex strings.

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use plasma_exit_core::{Block, LogEntry, Transaction, TransactionReceipt};
use serde::{Deserialize, Serialize};

use crate::ChainClientError;

/// Block object returned by `eth_getBlockBy*` with full transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub number: U64,
    pub hash: B256,
    pub parent_hash: B256,
    pub timestamp: U64,
    pub transactions_root: B256,
    pub receipts_root: B256,
    pub transactions: Vec<RpcTransaction>,
}

/// Transaction object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    #[serde(rename = "type", default)]
    pub transaction_type: Option<U64>,
    pub nonce: U64,
    /// Absent on fee market transactions
    #[serde(default)]
    pub gas_price: Option<U256>,
    pub gas: U64,
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub v: U64,
    pub r: U256,
    pub s: U256,
    pub hash: B256,
    pub block_hash: B256,
    pub block_number: U64,
    pub transaction_index: U64,
}

/// Receipt object returned by `eth_getTransactionReceipt`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub block_hash: B256,
    pub block_number: U64,
    pub transaction_hash: B256,
    pub transaction_index: U64,
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub root: Option<B256>,
    pub cumulative_gas_used: U64,
    pub gas_used: U64,
    pub contract_address: Option<Address>,
    pub logs: Vec<RpcLog>,
    pub logs_bloom: Bytes,
}

/// Log object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub log_index: U64,
    pub transaction_index: U64,
    pub block_hash: B256,
    pub block_number: U64,
}

impl TryFrom<RpcBlock> for Block {
    type Error = ChainClientError;

    fn try_from(block: RpcBlock) -> Result<Self, Self::Error> {
        Ok(Block {
            number: block.number.to(),
            hash: block.hash,
            parent_hash: block.parent_hash,
            timestamp: block.timestamp.to(),
            transactions_root: block.transactions_root,
            receipts_root: block.receipts_root,
            transactions: block
                .transactions
                .into_iter()
                .map(Transaction::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<RpcTransaction> for Transaction {
    type Error = ChainClientError;

    fn try_from(tx: RpcTransaction) -> Result<Self, Self::Error> {
        let transaction_type = tx
            .transaction_type
            .map(|ty| {
                u8::try_from(ty.to::<u64>()).map_err(|_| {
                    ChainClientError::InvalidResponse(format!(
                        "transaction {} has type {ty} outside the EIP-2718 range",
                        tx.hash
                    ))
                })
            })
            .transpose()?;

        Ok(Transaction {
            transaction_type,
            nonce: tx.nonce.to(),
            gas_price: tx.gas_price.unwrap_or_default(),
            gas: tx.gas.to(),
            to: tx.to,
            value: tx.value,
            input: tx.input,
            v: tx.v.to(),
            r: tx.r,
            s: tx.s,
            hash: tx.hash,
            block_hash: tx.block_hash,
            block_number: tx.block_number.to(),
            transaction_index: tx.transaction_index.to(),
        })
    }
}

impl From<RpcReceipt> for TransactionReceipt {
    fn from(receipt: RpcReceipt) -> Self {
        TransactionReceipt {
            block_hash: receipt.block_hash,
            block_number: receipt.block_number.to(),
            transaction_hash: receipt.transaction_hash,
            transaction_index: receipt.transaction_index.to(),
            status: receipt.status.map(|status| !status.is_zero()),
            root: receipt.root,
            cumulative_gas_used: receipt.cumulative_gas_used.to(),
            gas_used: receipt.gas_used.to(),
            contract_address: receipt.contract_address,
            logs: receipt.logs.into_iter().map(Into::into).collect(),
            logs_bloom: receipt.logs_bloom,
        }
    }
}

impl From<RpcLog> for LogEntry {
    fn from(log: RpcLog) -> Self {
        LogEntry {
            address: log.address,
            topics: log.topics,
            data: log.data,
            log_index: log.log_index.to(),
            transaction_index: log.transaction_index.to(),
            block_hash: log.block_hash,
            block_number: log.block_number.to(),
        }
    }
}
