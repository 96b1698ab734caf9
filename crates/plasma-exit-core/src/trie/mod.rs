//! Merkle-Patricia trie proofs for the transactions and receipts of a block.

mod builder;
mod verify;

use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::encoding::encode_raw_list;
use crate::verification::Verification;

pub use builder::{receipt_proof, transaction_proof, PatriciaTrie};
pub use verify::verify_trie_proof;

/// Inclusion proof of one value in a block's transactions or receipts trie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieProof {
    /// Trie key, `RLP(transactionIndex)`
    pub key: Bytes,
    /// Raw value stored at the key
    pub value: Bytes,
    /// Encodings of the hash-referenced nodes on the path, from the root down
    pub parent_nodes: Vec<Bytes>,
    /// Trie root the proof was built against
    pub root: B256,
    /// Hash of the block the trie belongs to
    pub block_hash: B256,
}

impl TrieProof {
    /// Replay the proof against its own root.
    pub fn verify(&self) -> Verification {
        verify_trie_proof(self.root, &self.key, &self.value, &self.parent_nodes)
    }

    /// The parent nodes as one RLP list, each node embedded verbatim.
    pub fn encoded_parent_nodes(&self) -> Bytes {
        encode_raw_list(&self.parent_nodes).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{receipt_bytes, rlp_index, tx_bytes};
    use crate::error::ProofError;
    use crate::test_utils::block_with;
    use crate::verification::RejectReason;

    #[test]
    fn test_transaction_proof_in_seven_transaction_block() {
        let (block, _) = block_with(5, 1_700_000_000, 7);
        let proof = transaction_proof(&block, 3).unwrap();

        assert_eq!(proof.root, block.transactions_root);
        assert_eq!(proof.block_hash, block.hash);
        assert_eq!(proof.key, rlp_index(3));
        assert_eq!(proof.value, tx_bytes(&block.transactions[3]).unwrap());
        assert!(proof.verify().is_accepted());

        // same shape, different values
        let (other, _) = block_with(6, 1_700_000_000, 7);
        assert_ne!(other.transactions_root, block.transactions_root);
        assert_eq!(
            verify_trie_proof(
                other.transactions_root,
                &proof.key,
                &proof.value,
                &proof.parent_nodes
            ),
            Verification::Rejected(RejectReason::TrieRootMismatch)
        );
    }

    #[test]
    fn test_receipt_proof() {
        let (block, receipts) = block_with(9, 1_700_000_100, 4);
        for index in 0..4 {
            let proof = receipt_proof(&block, &receipts, index).unwrap();
            assert_eq!(proof.root, block.receipts_root);
            assert_eq!(
                proof.value,
                receipt_bytes(&receipts[index as usize]).unwrap()
            );
            assert!(proof.verify().is_accepted());
        }
    }

    #[test]
    fn test_root_cross_check() {
        let (mut block, mut receipts) = block_with(5, 1_700_000_000, 3);
        let expected = block.transactions_root;
        block.transactions[1].nonce += 1;
        assert!(matches!(
            transaction_proof(&block, 0),
            Err(ProofError::RootMismatch { expected: e, .. }) if e == expected
        ));

        receipts[2].cumulative_gas_used += 1;
        assert!(matches!(
            receipt_proof(&block, &receipts, 0),
            Err(ProofError::RootMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_index_and_bad_ordering() {
        let (block, receipts) = block_with(5, 1_700_000_000, 3);
        assert_eq!(
            transaction_proof(&block, 3),
            Err(ProofError::KeyNotFound(rlp_index(3)))
        );

        let mut swapped = block.clone();
        swapped.transactions.swap(0, 1);
        assert_eq!(
            transaction_proof(&swapped, 0),
            Err(ProofError::TransactionIndexMismatch {
                position: 0,
                index: 1
            })
        );

        let mut reordered = receipts.clone();
        reordered.swap(1, 2);
        assert_eq!(
            receipt_proof(&block, &reordered, 0),
            Err(ProofError::TransactionIndexMismatch {
                position: 1,
                index: 2
            })
        );
    }

    #[test]
    fn test_encoded_parent_nodes() {
        let (block, _) = block_with(5, 1_700_000_000, 7);
        let proof = transaction_proof(&block, 3).unwrap();
        let encoded = proof.encoded_parent_nodes();
        let header = alloy_rlp::Header::decode(&mut &encoded[..]).unwrap();
        assert!(header.list);
        let body: Vec<u8> = proof.parent_nodes.iter().flat_map(|n| n.to_vec()).collect();
        assert!(encoded.ends_with(&body));
        assert_eq!(header.payload_length, body.len());
    }
}
