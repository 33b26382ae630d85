//! Common - Protocol Primitives for the Bonded Bridge
//!
//! This package holds the pieces that must be computed identically on every
//! chain the bridge runs on:
//! - `transfer` - the transfer record and its identifier (Merkle leaf)
//! - `merkle` - the Merkle accumulator, roots and inclusion proofs
//! - `exchange` / `messenger` - message interfaces of external collaborators

pub mod exchange;
pub mod hash;
pub mod merkle;
pub mod messenger;
pub mod transfer;

pub use hash::{bytes32_to_hex, keccak256, Bytes32};
pub use merkle::{compute_root, hash_pair, verify_proof, MerkleProof, MerkleTree};
pub use transfer::Transfer;
