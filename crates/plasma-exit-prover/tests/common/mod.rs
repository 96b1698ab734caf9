//! In-memory child chain, checkpoint ledger and signer.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Mutex;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use plasma_chain_client::{ChainClientError, ChainDataSource, CheckpointSigner, RootChain};
use plasma_exit_core::encoding::{receipt_bytes, tx_bytes};
use plasma_exit_core::{
    Block, HeaderBlockRange, LogEntry, PatriciaTrie, Transaction, TransactionReceipt,
};

pub const INTERVAL: u64 = 10_000;
pub const GENESIS_TIME: u64 = 1_650_000_000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn tx_hash(block_number: u64, index: u64) -> B256 {
    keccak256([block_number.to_be_bytes(), index.to_be_bytes()].concat())
}

pub fn block_hash(block_number: u64) -> B256 {
    keccak256(block_number.to_be_bytes())
}

fn transaction(block_number: u64, index: u64) -> Transaction {
    Transaction {
        transaction_type: None,
        nonce: block_number * 10 + index,
        gas_price: U256::from(1_000_000_000u64),
        gas: 100_000,
        to: Some(Address::with_last_byte(index as u8 + 1)),
        value: U256::from(block_number * 1_000 + index),
        input: Bytes::from(vec![0xa9, 0x05, 0x9c, 0xbb, block_number as u8, index as u8]),
        v: 27 + (block_number + index) % 2,
        r: U256::from(0x1000 + block_number),
        s: U256::from(0x2000 + index),
        hash: tx_hash(block_number, index),
        block_hash: block_hash(block_number),
        block_number,
        transaction_index: index,
    }
}

fn receipt(tx: &Transaction) -> TransactionReceipt {
    let logs = (0..=tx.transaction_index % 2)
        .map(|log| LogEntry {
            address: Address::repeat_byte(0xee),
            topics: vec![B256::repeat_byte(0x01), B256::left_padding_from(&tx.nonce.to_be_bytes())],
            data: Bytes::from(tx.value.to_be_bytes::<32>().to_vec()),
            log_index: log,
            transaction_index: tx.transaction_index,
            block_hash: tx.block_hash,
            block_number: tx.block_number,
        })
        .collect();
    TransactionReceipt {
        block_hash: tx.block_hash,
        block_number: tx.block_number,
        transaction_hash: tx.hash,
        transaction_index: tx.transaction_index,
        status: Some(true),
        root: None,
        cumulative_gas_used: 30_000 * (tx.transaction_index + 1),
        gas_used: 30_000,
        contract_address: None,
        logs,
        logs_bloom: Bytes::from(vec![0u8; 256]),
    }
}

/// A block of `tx_count` transactions with matching trie roots.
pub fn make_block(number: u64, tx_count: u64) -> (Block, Vec<TransactionReceipt>) {
    let transactions: Vec<Transaction> = (0..tx_count).map(|i| transaction(number, i)).collect();
    let receipts: Vec<TransactionReceipt> = transactions.iter().map(receipt).collect();

    let mut tx_trie = PatriciaTrie::new();
    let mut receipt_trie = PatriciaTrie::new();
    for (tx, receipt) in transactions.iter().zip(&receipts) {
        tx_trie.insert(tx.transaction_index, tx_bytes(tx).unwrap());
        receipt_trie.insert(tx.transaction_index, receipt_bytes(receipt).unwrap());
    }

    let block = Block {
        number,
        hash: block_hash(number),
        parent_hash: block_hash(number.wrapping_sub(1)),
        timestamp: GENESIS_TIME + number * 2,
        transactions_root: tx_trie.root_hash(),
        receipts_root: receipt_trie.root_hash(),
        transactions,
    };
    (block, receipts)
}

/// Child chain held in memory.
#[derive(Debug, Default)]
pub struct Chain {
    blocks: HashMap<u64, Block>,
    numbers: HashMap<B256, u64>,
    receipts: HashMap<B256, TransactionReceipt>,
}

impl Chain {
    /// Blocks `range`, block `n` holding `n % 4 + 1` transactions
    pub fn with_blocks(range: RangeInclusive<u64>) -> Self {
        let mut chain = Self::default();
        for number in range {
            let (block, receipts) = make_block(number, number % 4 + 1);
            chain.insert(block, receipts);
        }
        chain
    }

    pub fn insert(&mut self, block: Block, receipts: Vec<TransactionReceipt>) {
        for receipt in receipts {
            self.receipts.insert(receipt.transaction_hash, receipt);
        }
        self.numbers.insert(block.hash, block.number);
        self.blocks.insert(block.number, block);
    }

    pub fn block(&self, number: u64) -> &Block {
        &self.blocks[&number]
    }

    pub fn remove_block(&mut self, number: u64) {
        self.blocks.remove(&number);
    }

    pub fn corrupt_transactions_root(&mut self, number: u64) {
        if let Some(block) = self.blocks.get_mut(&number) {
            block.transactions_root = B256::repeat_byte(0xba);
        }
    }
}

#[async_trait]
impl ChainDataSource for Chain {
    async fn get_block(&self, number: u64) -> Result<Block, ChainClientError> {
        self.blocks
            .get(&number)
            .cloned()
            .ok_or(ChainClientError::BlockNotFound(number))
    }

    async fn get_block_by_hash(&self, hash: B256) -> Result<Block, ChainClientError> {
        self.numbers
            .get(&hash)
            .and_then(|number| self.blocks.get(number))
            .cloned()
            .ok_or(ChainClientError::BlockHashNotFound(hash))
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<TransactionReceipt, ChainClientError> {
        self.receipts
            .get(&tx_hash)
            .cloned()
            .ok_or(ChainClientError::ReceiptNotFound(tx_hash))
    }
}

/// Checkpoint ledger that accepts every submission.
#[derive(Debug, Default)]
pub struct Ledger {
    checkpoints: Mutex<Vec<HeaderBlockRange>>,
}

impl Ledger {
    pub fn checkpoints(&self) -> Vec<HeaderBlockRange> {
        self.checkpoints.lock().unwrap().clone()
    }

    pub fn checkpoint(&self, id: u64) -> HeaderBlockRange {
        self.checkpoints()
            .into_iter()
            .find(|checkpoint| checkpoint.id == id)
            .unwrap()
    }

    pub fn overwrite_root(&self, id: u64, root: B256) {
        let mut checkpoints = self.checkpoints.lock().unwrap();
        if let Some(checkpoint) = checkpoints.iter_mut().find(|checkpoint| checkpoint.id == id) {
            checkpoint.root = root;
        }
    }
}

/// Decode `(proposer, start, end, root, accountHash, chainId)`
pub fn decode_checkpoint_data(data: &[u8]) -> (Address, u64, u64, B256, B256, u64) {
    let (proposer, start, end, root, account_hash, chain_id) =
        <(Address, U256, U256, B256, B256, U256)>::abi_decode_params(data, true).unwrap();
    (
        proposer,
        start.to(),
        end.to(),
        root,
        account_hash,
        chain_id.to(),
    )
}

#[async_trait]
impl RootChain for Ledger {
    async fn current_header_block(&self) -> Result<u64, ChainClientError> {
        Ok(self.checkpoints.lock().unwrap().len() as u64 * INTERVAL)
    }

    async fn get_last_child_block(&self) -> Result<u64, ChainClientError> {
        let checkpoints = self.checkpoints.lock().unwrap();
        Ok(checkpoints.last().map_or(0, |checkpoint| checkpoint.end))
    }

    async fn header_blocks(&self, id: u64) -> Result<HeaderBlockRange, ChainClientError> {
        self.checkpoints
            .lock()
            .unwrap()
            .iter()
            .find(|checkpoint| checkpoint.id == id)
            .copied()
            .ok_or_else(|| ChainClientError::InvalidResponse(format!("no header block {id}")))
    }

    async fn submit_header_block(
        &self,
        data: Bytes,
        _signatures: Bytes,
    ) -> Result<u64, ChainClientError> {
        let (proposer, start, end, root, _, _) = decode_checkpoint_data(&data);
        let mut checkpoints = self.checkpoints.lock().unwrap();
        let id = (checkpoints.len() as u64 + 1) * INTERVAL;
        checkpoints.push(HeaderBlockRange {
            id,
            root,
            start,
            end,
            created_at: GENESIS_TIME + id,
            proposer,
        });
        Ok(id)
    }
}

/// Signs with a fixed-size stand-in signature over the data digest.
pub struct DigestSigner;

#[async_trait]
impl CheckpointSigner for DigestSigner {
    async fn sign(&self, data: &[u8]) -> Result<Bytes, ChainClientError> {
        let digest = keccak256(data);
        let mut signature = digest.to_vec();
        signature.extend_from_slice(digest.as_slice());
        signature.push(27);
        Ok(signature.into())
    }
}
