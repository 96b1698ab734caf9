//! Exit and challenge payloads submitted to the root chain.
//!
//! Both payloads are a single RLP list. The root chain verifier reads the
//! fields by position, so the order and the wrapping of every field below is
//! fixed:
//!
//! | # | field | encoding |
//! |---|-------|----------|
//! | 0 | header block id | integer |
//! | 1 | header proof | siblings concatenated into one string |
//! | 2 | block number | integer |
//! | 3 | block timestamp | integer |
//! | 4 | transactions root | 32-byte string |
//! | 5 | receipts root | 32-byte string |
//! | 6 | receipt | raw receipt encoding as a string |
//! | 7 | receipt parent nodes | RLP list of nodes, as a string |
//! | 8 | path | `0x00 ++ RLP(transactionIndex)` as a string |
//! | 9 | log index | integer |
//!
//! A challenge payload appends the raw transaction (10) and the transaction
//! parent nodes (11), encoded like fields 6 and 7.

use alloy_primitives::{Bytes, B256};
use alloy_rlp::Encodable;
use serde::{Deserialize, Serialize};

use crate::checkpoint::{concat_proof, verify_merkle_proof};
use crate::encoding::wrap_list;
use crate::header::header_digest;
use crate::trie::{verify_trie_proof, TrieProof};
use crate::types::HeaderBlockRange;
use crate::verification::{RejectReason, Verification};

/// Everything needed to prove that a receipt and its transaction belong to a
/// checkpointed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReference {
    /// Raw receipt encoding
    pub receipt: Bytes,
    /// Raw signed transaction encoding
    pub tx: Bytes,
    /// Proof of the receipt in the block's receipts trie
    pub receipt_proof: TrieProof,
    /// Proof of the transaction in the block's transactions trie
    pub tx_proof: TrieProof,
    pub transactions_root: B256,
    pub receipts_root: B256,
    /// Siblings linking the block header digest to the checkpoint root
    pub header_proof: Vec<B256>,
}

/// An exit claim for one log of a checkpointed receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitPayload {
    /// Id of the header block that committed the block
    pub header_block_id: u64,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub reference: ExitReference,
    /// Index of the log the exit is about, within the receipt
    pub log_index: u64,
}

impl ExitPayload {
    pub fn header_proof(&self) -> &[B256] {
        &self.reference.header_proof
    }

    /// Branch-mask path of the receipt and transaction in their tries.
    pub fn path(&self) -> Bytes {
        let key = &self.reference.receipt_proof.key;
        let mut path = Vec::with_capacity(key.len() + 1);
        path.push(0x00);
        path.extend_from_slice(key);
        path.into()
    }
}

/// Encode the payload of an exit.
pub fn encode_exit_payload(payload: &ExitPayload) -> Bytes {
    let mut out = Vec::new();
    encode_exit_fields(payload, &mut out);
    wrap_list(&out).into()
}

/// Encode the payload of a challenge: the exit fields followed by the
/// transaction and its trie proof.
pub fn encode_challenge_payload(payload: &ExitPayload) -> Bytes {
    let mut out = Vec::new();
    encode_exit_fields(payload, &mut out);
    payload.reference.tx.encode(&mut out);
    payload
        .reference
        .tx_proof
        .encoded_parent_nodes()
        .encode(&mut out);
    wrap_list(&out).into()
}

fn encode_exit_fields(payload: &ExitPayload, out: &mut Vec<u8>) {
    let reference = &payload.reference;
    payload.header_block_id.encode(out);
    concat_proof(&reference.header_proof).as_slice().encode(out);
    payload.block_number.encode(out);
    payload.block_timestamp.encode(out);
    reference.transactions_root.encode(out);
    reference.receipts_root.encode(out);
    reference.receipt.encode(out);
    reference.receipt_proof.encoded_parent_nodes().encode(out);
    payload.path().encode(out);
    payload.log_index.encode(out);
}

/// Replay every proof of `payload` against the checkpoint that committed it.
///
/// Checks the receipt and transaction against the roots carried by the
/// payload, then the block header built from those roots against the
/// checkpoint root.
pub fn verify_exit_reference(payload: &ExitPayload, checkpoint: &HeaderBlockRange) -> Verification {
    let reference = &payload.reference;
    if reference.receipt_proof.key != reference.tx_proof.key {
        return RejectReason::KeyMismatch.into();
    }
    let Some(leaf_index) = checkpoint.leaf_index(payload.block_number) else {
        return RejectReason::BlockOutsideCheckpoint.into();
    };

    let receipt = verify_trie_proof(
        reference.receipts_root,
        &reference.receipt_proof.key,
        &reference.receipt,
        &reference.receipt_proof.parent_nodes,
    );
    let tx = verify_trie_proof(
        reference.transactions_root,
        &reference.tx_proof.key,
        &reference.tx,
        &reference.tx_proof.parent_nodes,
    );
    let leaf = header_digest(
        payload.block_number,
        payload.block_timestamp,
        reference.transactions_root,
        reference.receipts_root,
    );
    let header = verify_merkle_proof(leaf, leaf_index, checkpoint.root, &reference.header_proof);

    receipt.and(tx).and(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::CheckpointTree;
    use crate::encoding::{receipt_bytes, tx_bytes};
    use crate::header::block_header_digest;
    use crate::test_utils::block_with;
    use crate::trie::{receipt_proof, transaction_proof};
    use alloy_primitives::Address;

    fn singleton_exit() -> (ExitPayload, HeaderBlockRange) {
        let (block, receipts) = block_with(20, 1_650_000_000, 2);
        let tree = CheckpointTree::from_leaves(vec![block_header_digest(&block)]).unwrap();
        let checkpoint = HeaderBlockRange {
            id: 10_000,
            root: tree.root(),
            start: 20,
            end: 20,
            created_at: 1_650_000_100,
            proposer: Address::repeat_byte(0x01),
        };

        let payload = ExitPayload {
            header_block_id: checkpoint.id,
            block_number: block.number,
            block_timestamp: block.timestamp,
            reference: ExitReference {
                receipt: receipt_bytes(&receipts[1]).unwrap(),
                tx: tx_bytes(&block.transactions[1]).unwrap(),
                receipt_proof: receipt_proof(&block, &receipts, 1).unwrap(),
                tx_proof: transaction_proof(&block, 1).unwrap(),
                transactions_root: block.transactions_root,
                receipts_root: block.receipts_root,
                header_proof: tree.proof_at(0).unwrap(),
            },
            log_index: 0,
        };
        (payload, checkpoint)
    }

    /// Encode an RLP string.
    fn string(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        bytes.encode(&mut out);
        out
    }

    #[test]
    fn test_singleton_checkpoint_exit_layout() {
        let (payload, checkpoint) = singleton_exit();
        let reference = &payload.reference;
        assert!(reference.header_proof.is_empty());
        assert_eq!(
            checkpoint.root,
            header_digest(20, 1_650_000_000, reference.transactions_root, reference.receipts_root)
        );

        let mut fields = Vec::new();
        fields.extend_from_slice(&[0x82, 0x27, 0x10]); // 10000
        fields.push(0x80); // empty header proof
        fields.push(0x14); // block 20
        fields.extend_from_slice(&[0x84, 0x62, 0x59, 0x00, 0x80]); // 1650000000
        fields.push(0xa0);
        fields.extend_from_slice(reference.transactions_root.as_slice());
        fields.push(0xa0);
        fields.extend_from_slice(reference.receipts_root.as_slice());
        fields.extend_from_slice(&string(&reference.receipt));
        fields.extend_from_slice(&string(&reference.receipt_proof.encoded_parent_nodes()));
        fields.extend_from_slice(&[0x82, 0x00, 0x01]); // path for index 1
        fields.push(0x80); // log index 0

        let encoded = encode_exit_payload(&payload);
        assert_eq!(encoded, Bytes::from(wrap_list(&fields)));
        // deterministic
        assert_eq!(encoded, encode_exit_payload(&payload));

        let mut challenge_fields = fields.clone();
        challenge_fields.extend_from_slice(&string(&reference.tx));
        challenge_fields.extend_from_slice(&string(&reference.tx_proof.encoded_parent_nodes()));
        assert_eq!(
            encode_challenge_payload(&payload),
            Bytes::from(wrap_list(&challenge_fields))
        );
    }

    #[test]
    fn test_header_proof_is_one_string() {
        let (mut payload, _) = singleton_exit();
        payload.reference.header_proof = vec![B256::repeat_byte(0x0a), B256::repeat_byte(0x0b)];
        let encoded = encode_exit_payload(&payload);

        let mut proof_field = vec![0xb8, 0x40];
        proof_field.extend_from_slice(&[0x0a; 32]);
        proof_field.extend_from_slice(&[0x0b; 32]);
        let at = encoded
            .windows(proof_field.len())
            .position(|window| window == proof_field.as_slice());
        // list header (3 bytes) and the header block id (3 bytes) come first
        assert_eq!(at, Some(6));
    }

    #[test]
    fn test_verify_exit_reference() {
        let (payload, checkpoint) = singleton_exit();
        assert_eq!(
            verify_exit_reference(&payload, &checkpoint),
            Verification::Accepted
        );

        let mut wrong_log_receipt = payload.clone();
        let mut receipt = wrong_log_receipt.reference.receipt.to_vec();
        let last = receipt.len() - 1;
        receipt[last] ^= 0xff;
        wrong_log_receipt.reference.receipt = receipt.into();
        assert_eq!(
            verify_exit_reference(&wrong_log_receipt, &checkpoint),
            Verification::Rejected(RejectReason::ValueMismatch)
        );

        let mut wrong_time = payload.clone();
        wrong_time.block_timestamp += 1;
        assert_eq!(
            verify_exit_reference(&wrong_time, &checkpoint),
            Verification::Rejected(RejectReason::RootMismatch)
        );

        let mut outside = payload.clone();
        outside.block_number = 21;
        assert_eq!(
            verify_exit_reference(&outside, &checkpoint),
            Verification::Rejected(RejectReason::BlockOutsideCheckpoint)
        );

        let mut mixed = payload;
        mixed.reference.tx_proof.key = Bytes::from_static(&[0x80]);
        assert_eq!(
            verify_exit_reference(&mixed, &checkpoint),
            Verification::Rejected(RejectReason::KeyMismatch)
        );
    }
}
