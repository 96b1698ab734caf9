//! Merkle tree over a contiguous range of block header digests.
//!
//! The root of this tree is what a checkpoint commits to the root chain. The
//! tree hashes pairs as `keccak256(left || right)` and always has a power of two
//! leaves, so every proof out of an `n` leaf tree is exactly `ceil(log2 n)`
//! siblings long.

use alloy_primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};

use crate::error::{ProofError, ProofResult};
use crate::verification::{RejectReason, Verification};

/// Maximum depth of a checkpoint tree (2^20 blocks per checkpoint).
pub const MAX_TREE_DEPTH: usize = 20;

/// How a level with an odd node count is completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafPadding {
    /// Extend the leaves with zero words up to the next power of two.
    #[default]
    ZeroLeaves,
    /// Pair the last node of an odd level with itself.
    DuplicateLast,
}

/// Checkpoint Merkle tree, stored level by level from the leaves up.
#[derive(Debug, Clone)]
pub struct CheckpointTree {
    layers: Vec<Vec<B256>>,
    leaf_count: usize,
    padding: LeafPadding,
}

impl CheckpointTree {
    /// Build the tree over `leaves`, keeping their order.
    pub fn new(leaves: Vec<B256>, padding: LeafPadding) -> ProofResult<Self> {
        if leaves.is_empty() {
            return Err(ProofError::EmptyTree);
        }
        let leaf_count = leaves.len();
        let depth = leaf_count.next_power_of_two().trailing_zeros() as usize;
        if depth > MAX_TREE_DEPTH {
            return Err(ProofError::TreeTooDeep {
                depth,
                max: MAX_TREE_DEPTH,
            });
        }

        let mut current = leaves;
        if padding == LeafPadding::ZeroLeaves {
            current.resize(leaf_count.next_power_of_two(), B256::ZERO);
        }

        let mut layers = Vec::with_capacity(depth + 1);
        while current.len() > 1 {
            let parent = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    [last] => hash_pair(last, last),
                    _ => unreachable!("chunk size is at most 2"),
                })
                .collect();
            layers.push(current);
            current = parent;
        }
        layers.push(current);

        Ok(Self {
            layers,
            leaf_count,
            padding,
        })
    }

    /// Build with the default (zero leaf) padding.
    pub fn from_leaves(leaves: Vec<B256>) -> ProofResult<Self> {
        Self::new(leaves, LeafPadding::default())
    }

    pub fn root(&self) -> B256 {
        // layers always ends with the single root node
        self.layers[self.layers.len() - 1][0]
    }

    /// Number of levels above the leaves, equal to every proof's length.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Number of real (unpadded) leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn leaves(&self) -> &[B256] {
        &self.layers[0][..self.leaf_count]
    }

    pub fn padding(&self) -> LeafPadding {
        self.padding
    }

    /// Leaf-to-root siblings for the first occurrence of `leaf`.
    pub fn proof(&self, leaf: B256) -> ProofResult<Vec<B256>> {
        let index = self
            .leaves()
            .iter()
            .position(|candidate| *candidate == leaf)
            .ok_or(ProofError::LeafNotFound(leaf))?;
        self.proof_at(index)
    }

    /// Leaf-to-root siblings for the leaf at `index`.
    pub fn proof_at(&self, index: usize) -> ProofResult<Vec<B256>> {
        if index >= self.leaf_count {
            return Err(ProofError::LeafIndexOutOfRange {
                index,
                leaf_count: self.leaf_count,
            });
        }

        let mut path = Vec::with_capacity(self.depth());
        let mut current_index = index;
        for layer in &self.layers[..self.depth()] {
            let sibling_index = if current_index % 2 == 1 {
                current_index - 1
            } else {
                (current_index + 1).min(layer.len() - 1)
            };
            path.push(layer[sibling_index]);
            current_index /= 2;
        }
        Ok(path)
    }
}

/// Fold `proof` from `leaf` up and compare against `root`.
///
/// At each level an even index means the running node is the left child.
pub fn verify_merkle_proof(leaf: B256, index: usize, root: B256, proof: &[B256]) -> Verification {
    let mut current = leaf;
    let mut index = index;
    for sibling in proof {
        current = if index % 2 == 0 {
            hash_pair(&current, sibling)
        } else {
            hash_pair(sibling, &current)
        };
        index /= 2;
    }

    if current == root {
        Verification::Accepted
    } else {
        RejectReason::RootMismatch.into()
    }
}

/// Same as [`verify_merkle_proof`] over siblings concatenated in one byte string,
/// as carried by exit payloads.
pub fn verify_concatenated_proof(
    leaf: B256,
    index: usize,
    root: B256,
    proof: &[u8],
) -> Verification {
    if proof.len() % 32 != 0 {
        return RejectReason::MalformedMerkleProof.into();
    }
    let siblings: Vec<B256> = proof.chunks_exact(32).map(B256::from_slice).collect();
    verify_merkle_proof(leaf, index, root, &siblings)
}

/// Concatenate proof siblings into a single byte string.
pub fn concat_proof(proof: &[B256]) -> Vec<u8> {
    proof.iter().flat_map(|node| node.0).collect()
}

fn hash_pair(left: &B256, right: &B256) -> B256 {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(left.as_slice());
    data[32..].copy_from_slice(right.as_slice());
    keccak256(data)
}
