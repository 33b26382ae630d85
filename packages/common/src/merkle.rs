//! Binary Merkle accumulator over transfer identifiers.
//!
//! # Construction
//! - Level 0 holds the leaves in insertion order.
//! - Adjacent nodes are combined with `keccak256(left || right)`.
//! - A level with an odd number of nodes pairs its last node with itself.
//! - At least one pairing step is always performed, so a single leaf `a`
//!   yields the root `keccak256(a || a)` and a root is never a raw leaf.
//!
//! The destination chain recomputes roots from proofs with the same rules.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, StdResult};

use crate::hash::{binary_to_bytes32, keccak256, Bytes32};

/// Combine two sibling nodes, order preserved
pub fn hash_pair(left: &Bytes32, right: &Bytes32) -> Bytes32 {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(left);
    data[32..].copy_from_slice(right);
    keccak256(&data)
}

/// Inclusion proof for one leaf
#[cw_serde]
pub struct MerkleProof {
    /// Position of the leaf in the committed order
    pub index: u32,
    /// Sibling hashes from the leaf level up to just below the root
    pub siblings: Vec<Binary>,
}

/// A fully materialized tree; `layers[0]` are the leaves, the last layer is the root
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<Bytes32>>,
}

impl MerkleTree {
    /// Build the tree. Returns `None` for an empty leaf set.
    pub fn new(leaves: &[Bytes32]) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let mut layers = vec![leaves.to_vec()];
        loop {
            let current = &layers[layers.len() - 1];
            if current.len() == 1 && layers.len() > 1 {
                break;
            }

            let next: Vec<Bytes32> = current
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            layers.push(next);
        }

        Some(Self { layers })
    }

    pub fn root(&self) -> Bytes32 {
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaves(&self) -> &[Bytes32] {
        &self.layers[0]
    }

    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Proof for the leaf at `index`, or `None` if out of range
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaves().len() {
            return None;
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut position = index;
        for layer in &self.layers[..self.depth()] {
            let sibling = layer.get(position ^ 1).unwrap_or(&layer[position]);
            siblings.push(Binary::from(sibling.to_vec()));
            position >>= 1;
        }

        Some(MerkleProof {
            index: index as u32,
            siblings,
        })
    }

    /// Proof for the first occurrence of `leaf`
    pub fn proof_for(&self, leaf: &Bytes32) -> Option<MerkleProof> {
        let index = self.leaves().iter().position(|l| l == leaf)?;
        self.proof(index)
    }
}

/// Root over `leaves`, `None` when empty
pub fn compute_root(leaves: &[Bytes32]) -> Option<Bytes32> {
    MerkleTree::new(leaves).map(|tree| tree.root())
}

/// Recompute the root implied by `leaf` and `proof`
pub fn root_from_proof(leaf: &Bytes32, proof: &MerkleProof) -> StdResult<Option<Bytes32>> {
    if proof.siblings.is_empty() {
        return Ok(None);
    }

    let mut node = *leaf;
    let mut position = proof.index;
    for sibling in &proof.siblings {
        let sibling = binary_to_bytes32(sibling)?;
        node = if position & 1 == 0 {
            hash_pair(&node, &sibling)
        } else {
            hash_pair(&sibling, &node)
        };
        position >>= 1;
    }

    // Index bits beyond the proof height would name a leaf outside the tree
    if position != 0 {
        return Ok(None);
    }

    Ok(Some(node))
}

/// Check that `leaf` is a member of the tree committed to by `root`
pub fn verify_proof(root: &Bytes32, leaf: &Bytes32, proof: &MerkleProof) -> bool {
    matches!(root_from_proof(leaf, proof), Ok(Some(computed)) if &computed == root)
}
