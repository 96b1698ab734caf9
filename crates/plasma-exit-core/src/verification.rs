//! Typed outcome of replaying a proof.

use serde::{Deserialize, Serialize};

/// Result of verifying a Merkle or Patricia trie proof.
///
/// A rejected proof is an expected outcome (evidence of an invalid exit),
/// so it is a value and never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    /// The proof links the claimed value to the trusted root.
    Accepted,
    /// The proof does not link the claimed value to the trusted root.
    Rejected(RejectReason),
}

/// Why a proof was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Folding the Merkle path does not reproduce the root.
    RootMismatch,
    /// A Merkle proof is not a whole number of 32-byte words.
    MalformedMerkleProof,
    /// The first parent node does not hash to the trie root.
    TrieRootMismatch,
    /// The parent node at `depth` is not a valid branch, extension or leaf.
    MalformedNode { depth: usize },
    /// Walking the key through the parent nodes does not end at the claimed value.
    ValueMismatch,
    /// The claimed value is empty, which no trie entry can hold.
    EmptyValue,
    /// No parent nodes were supplied.
    IncompleteProof,
    /// The receipt and transaction proofs are for different trie keys.
    KeyMismatch,
    /// The block is not covered by the checkpoint it claims.
    BlockOutsideCheckpoint,
}

impl Verification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verification::Accepted)
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Verification::Accepted => None,
            Verification::Rejected(reason) => Some(*reason),
        }
    }

    /// Combine two outcomes, keeping the first rejection.
    pub fn and(self, other: Verification) -> Verification {
        match self {
            Verification::Accepted => other,
            rejected => rejected,
        }
    }
}

impl From<RejectReason> for Verification {
    fn from(reason: RejectReason) -> Self {
        Verification::Rejected(reason)
    }
}
