//! Replay of Merkle-Patricia inclusion proofs against a trusted root.

use alloy_primitives::{keccak256, Bytes, B256};
use alloy_rlp::Decodable;
use alloy_trie::nodes::TrieNode;
use alloy_trie::proof::verify_proof;
use alloy_trie::Nibbles;
use tracing::trace;

use crate::verification::{RejectReason, Verification};

/// Check that `parent_nodes` link `value` at `key` to `root`.
///
/// The first node must hash to `root`; the walk itself is alloy's
/// [`verify_proof`], which must end exactly at `key` holding `value`. Tries
/// never store empty values, so an empty claim is always rejected. Malformed
/// input is rejected, never raised.
pub fn verify_trie_proof(
    root: B256,
    key: &[u8],
    value: &[u8],
    parent_nodes: &[Bytes],
) -> Verification {
    if value.is_empty() {
        return RejectReason::EmptyValue.into();
    }
    let Some(first) = parent_nodes.first() else {
        return RejectReason::IncompleteProof.into();
    };
    if keccak256(first) != root {
        return RejectReason::TrieRootMismatch.into();
    }
    for (depth, raw) in parent_nodes.iter().enumerate() {
        if !decodes_cleanly(raw) {
            return RejectReason::MalformedNode { depth }.into();
        }
    }

    match verify_proof(root, Nibbles::unpack(key), Some(value.to_vec()), parent_nodes) {
        Ok(()) => Verification::Accepted,
        Err(err) => {
            trace!("Trie proof rejected: {err}");
            RejectReason::ValueMismatch.into()
        }
    }
}

/// Decode `raw` as a trie node, following embedded children the way the walk
/// will. An embedded extension must wrap an embedded branch.
fn decodes_cleanly(raw: &[u8]) -> bool {
    match TrieNode::decode(&mut &raw[..]) {
        Ok(TrieNode::Branch(branch)) => branch
            .stack
            .iter()
            .filter(|child| child.as_hash().is_none())
            .all(|child| decodes_cleanly(child.as_slice())),
        Ok(TrieNode::Extension(extension)) if extension.child.as_hash().is_none() => {
            matches!(
                TrieNode::decode(&mut extension.child.as_slice()),
                Ok(TrieNode::Branch(_))
            ) && decodes_cleanly(extension.child.as_slice())
        }
        Ok(_) => true,
        Err(_) => false,
    }
}
