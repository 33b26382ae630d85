//! Hashing primitives shared by the transfer identifier and the Merkle accumulator.
//!
//! Everything hashed by the bridge is laid out as a sequence of 32-byte words,
//! numbers big-endian and left-padded, then passed through keccak256.

use cosmwasm_std::{Binary, StdError, StdResult};
use tiny_keccak::{Hasher, Keccak};

/// A 32-byte hash (transfer identifier, Merkle node or root)
pub type Bytes32 = [u8; 32];

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> Bytes32 {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Encode a u64 as a 32-byte word (big-endian, left-padded)
pub fn u64_word(value: u64) -> Bytes32 {
    let mut word = [0u8; 32];
    // u64 (8 bytes) goes into bytes 24-31
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encode a u128 as a 32-byte word (big-endian, left-padded)
pub fn u128_word(value: u128) -> Bytes32 {
    let mut word = [0u8; 32];
    // u128 (16 bytes) goes into bytes 16-31
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Convert 32-byte hash to hex string (for attributes)
pub fn bytes32_to_hex(bytes: &Bytes32) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse hex string (with or without 0x prefix) to 32-byte array
pub fn hex_to_bytes32(value: &str) -> Result<Bytes32, &'static str> {
    let value = value.strip_prefix("0x").unwrap_or(value);
    if value.len() != 64 {
        return Err("Invalid hex length: expected 64 characters");
    }

    let mut result = [0u8; 32];
    hex::decode_to_slice(value, &mut result).map_err(|_| "Invalid hex character")?;
    Ok(result)
}

/// Interpret a message-level `Binary` as a 32-byte hash
pub fn binary_to_bytes32(value: &Binary) -> StdResult<Bytes32> {
    value.as_slice().try_into().map_err(|_| {
        StdError::generic_err(format!(
            "Invalid hash length: expected 32 bytes, got {}",
            value.len()
        ))
    })
}
