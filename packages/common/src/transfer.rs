//! Transfer record and its identifier.
//!
//! # Leaf Layout (224 bytes total)
//! - Bytes 0-31:    chain_id (uint64, big-endian, left-padded)
//! - Bytes 32-63:   keccak256(recipient)
//! - Bytes 64-95:   amount (uint128, big-endian, left-padded)
//! - Bytes 96-127:  transfer_nonce (uint64, big-endian, left-padded)
//! - Bytes 128-159: relayer_fee (uint128, big-endian, left-padded)
//! - Bytes 160-191: amount_out_min (uint128, big-endian, left-padded)
//! - Bytes 192-223: deadline (uint64 unix seconds, big-endian, left-padded)
//!
//! `amount_out_min` and `deadline` are the bounds of the swap performed on the
//! destination chain at withdrawal time. A `deadline` of zero means the
//! recipient is paid in the bridge token without a swap.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::hash::{keccak256, u128_word, u64_word, Bytes32};

/// Size of the encoded leaf preimage
pub const TRANSFER_LEAF_LEN: usize = 7 * 32;

/// A single user transfer, as committed into a transfer root
#[cw_serde]
pub struct Transfer {
    /// Destination chain identifier
    pub chain_id: u64,
    /// Recipient account on the destination chain
    pub recipient: String,
    /// Gross amount in bridge token units (relayer fee included)
    pub amount: Uint128,
    /// Sender-chosen disambiguator
    pub transfer_nonce: u64,
    /// Paid to whoever executes the withdrawal on the destination chain
    pub relayer_fee: Uint128,
    /// Minimum output of the destination-side swap
    pub amount_out_min: Uint128,
    /// Expiry of the destination-side swap (0 = no swap)
    pub deadline: u64,
}

impl Transfer {
    /// Serialize the transfer into its fixed leaf preimage
    pub fn encode(&self) -> [u8; TRANSFER_LEAF_LEN] {
        let mut data = [0u8; TRANSFER_LEAF_LEN];
        data[0..32].copy_from_slice(&u64_word(self.chain_id));
        data[32..64].copy_from_slice(&recipient_word(&self.recipient));
        data[64..96].copy_from_slice(&u128_word(self.amount.u128()));
        data[96..128].copy_from_slice(&u64_word(self.transfer_nonce));
        data[128..160].copy_from_slice(&u128_word(self.relayer_fee.u128()));
        data[160..192].copy_from_slice(&u128_word(self.amount_out_min.u128()));
        data[192..224].copy_from_slice(&u64_word(self.deadline));
        data
    }

    /// The transfer identifier: keccak256 of the encoded leaf
    pub fn transfer_id(&self) -> Bytes32 {
        keccak256(&self.encode())
    }

    /// Amount delivered to the recipient once the relayer fee is taken
    pub fn amount_after_fee(&self) -> Uint128 {
        self.amount.saturating_sub(self.relayer_fee)
    }
}

/// Recipients are chain-specific strings; they enter the leaf as their hash
pub fn recipient_word(recipient: &str) -> Bytes32 {
    keccak256(recipient.as_bytes())
}
