//! Error types for the bonded bridge contract
//!
//! Validation and capacity errors reject a call before any state is touched.
//! Consistency errors mean the call would break a protocol invariant (double
//! registration, overdraw, double bond, double settlement).

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only governance can perform this action")]
    Unauthorized,

    #[error("Unauthorized: caller is not a bonder")]
    UnauthorizedBonder,

    #[error("Unauthorized: only the root relayer can set transfer roots")]
    UnauthorizedRelayer,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Unsupported destination chain: {chain_id}")]
    UnsupportedDestination { chain_id: u64 },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Invalid funds: {reason}")]
    InvalidFunds { reason: String },

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },

    #[error("Slippage exceeded: minimum {amount_out_min}, quoted {amount_out}")]
    SlippageExceeded {
        amount_out_min: Uint128,
        amount_out: Uint128,
    },

    #[error("Swap expired: deadline {deadline}, block time {now}")]
    Expired { deadline: u64, now: u64 },

    #[error("Exchange address not configured")]
    ExchangeNotConfigured,

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ========================================================================
    // Capacity Errors
    // ========================================================================

    #[error("Batch overflow: chain {chain_id} already has {max} pending transfers")]
    BatchOverflow { chain_id: u64, max: u32 },

    #[error("Nothing to commit for chain {chain_id}")]
    NothingToCommit { chain_id: u64 },

    #[error("Nothing to settle")]
    NothingToSettle,

    // ========================================================================
    // Consistency Errors
    // ========================================================================

    #[error("Transfer already sent: {transfer_id}")]
    TransferAlreadySent { transfer_id: String },

    #[error("Duplicate transfer root: {root}")]
    DuplicateRoot { root: String },

    #[error("Unknown transfer root: {root}")]
    UnknownRoot { root: String },

    #[error("Transfer root overdrawn: {root} has {available} available, requested {requested}")]
    RootOverdrawn {
        root: String,
        requested: Uint128,
        available: Uint128,
    },

    #[error("Transfer already bonded: {transfer_id}")]
    AlreadyBonded { transfer_id: String },

    #[error("Transfer already settled: {transfer_id}")]
    AlreadySettled { transfer_id: String },

    #[error("Transfer already withdrawn: {transfer_id}")]
    AlreadyWithdrawn { transfer_id: String },

    #[error("Transfer not bonded: {transfer_id}")]
    NotBonded { transfer_id: String },

    #[error("Invalid Merkle proof")]
    InvalidProof,

    // ========================================================================
    // Bonder Accounting Errors
    // ========================================================================

    #[error("Insufficient bond: required {required}, available {available}")]
    InsufficientBond {
        required: Uint128,
        available: Uint128,
    },

    #[error("Bonder already registered")]
    BonderAlreadyRegistered,

    #[error("Bonder not registered")]
    BonderNotRegistered,

    #[error("Bonder has {debit} outstanding in unsettled bonds")]
    BonderHasOutstandingBonds { debit: Uint128 },
}
