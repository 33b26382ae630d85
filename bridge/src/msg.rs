//! Message types for the bonded bridge contract
//!
//! This module defines all messages for instantiation, execution, and queries.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};

use common::{MerkleProof, Transfer};

use crate::state::WithdrawalStatus;

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Governance address for contract management
    pub governance: String,
    /// Identifier of the chain this bridge is deployed on
    pub chain_id: u64,
    /// Denom of the bridge token
    pub bridge_denom: String,
    /// Denom of the canonical asset
    pub canonical_denom: String,
    /// Swap collaborator
    pub exchange: Option<String>,
    /// Outbound cross-domain channel
    pub messenger: Option<String>,
    /// Trusted sender of inbound transfer roots
    pub root_relayer: String,
    /// Cap on pending transfers per destination (default 100)
    pub max_pending_transfers: Option<u32>,
    /// Destinations enabled at launch
    pub supported_chain_ids: Vec<u64>,
    /// Bonders registered at launch
    pub bonders: Vec<String>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Send / Swap (source side)
    // ========================================================================
    /// Send bridge tokens to another chain
    ///
    /// Authorization: Anyone. Exactly `amount` of the bridge denom must be attached.
    ///
    /// `amount_out_min` and `deadline` bound the swap performed for the
    /// recipient on the destination chain (`deadline = 0` disables it).
    ///
    /// The recipient is only checked against the destination's address prefix
    /// when governance has set one. A recipient the destination cannot
    /// validate is committed but can never be withdrawn there.
    Send {
        chain_id: u64,
        recipient: String,
        amount: Uint128,
        transfer_nonce: u64,
        relayer_fee: Uint128,
        amount_out_min: Uint128,
        deadline: u64,
    },

    /// Swap canonical tokens into bridge tokens, then send them
    ///
    /// Authorization: Anyone. Exactly `amount` of the canonical denom must be attached.
    ///
    /// The post-swap amount is the transferred amount.
    SwapAndSend {
        chain_id: u64,
        recipient: String,
        amount: Uint128,
        transfer_nonce: u64,
        relayer_fee: Uint128,
        amount_out_min: Uint128,
        deadline: u64,
        destination_amount_out_min: Uint128,
        destination_deadline: u64,
    },

    /// Commit all pending transfers for one destination into a transfer root
    ///
    /// Authorization: Bonder or governance
    CommitTransfers { destination_chain_id: u64 },

    // ========================================================================
    // Root Registry (destination side)
    // ========================================================================
    /// Deliver a transfer root committed on another chain
    ///
    /// Authorization: Root relayer only. Exactly `total_amount` of the bridge
    /// denom must be attached.
    SetTransferRoot { root: Binary, total_amount: Uint128 },

    // ========================================================================
    // Bonding / Settlement (destination side)
    // ========================================================================
    /// Front a transfer to its recipient before its root arrives
    ///
    /// Authorization: Bonder only
    BondWithdrawal {
        recipient: String,
        amount: Uint128,
        transfer_nonce: u64,
        relayer_fee: Uint128,
        amount_out_min: Uint128,
        deadline: u64,
    },

    /// Reconcile one bonded withdrawal against a registered root
    ///
    /// Authorization: Anyone
    SettleBondedWithdrawal {
        transfer_id: Binary,
        root: Binary,
        proof: MerkleProof,
    },

    /// Reconcile every bonded withdrawal of a root at once
    ///
    /// Authorization: Anyone. `transfer_ids` must be the full committed list.
    SettleBondedWithdrawals {
        root: Binary,
        transfer_ids: Vec<Binary>,
    },

    /// Withdraw a transfer that no bonder fronted
    ///
    /// Authorization: Anyone (the caller earns the relayer fee)
    Withdraw {
        recipient: String,
        amount: Uint128,
        transfer_nonce: u64,
        relayer_fee: Uint128,
        amount_out_min: Uint128,
        deadline: u64,
        root: Binary,
        proof: MerkleProof,
    },

    /// Post bonder collateral (bridge denom attached)
    ///
    /// Authorization: Bonder only
    Stake {},

    /// Withdraw collateral not backing outstanding bonds
    ///
    /// Authorization: Bonder only
    Unstake { amount: Uint128 },

    // ========================================================================
    // Governance
    // ========================================================================
    AddSupportedChainIds { chain_ids: Vec<u64> },
    RemoveSupportedChainIds { chain_ids: Vec<u64> },
    AddBonder { address: String },
    RemoveBonder { address: String },
    SetExchangeAddress { address: Option<String> },
    SetMessengerAddress { address: Option<String> },
    SetRootRelayerAddress { address: String },
    SetMaxPendingTransfers { max: u32 },
    /// Require recipients on `chain_id` to be `<prefix>1...` (None clears the check)
    SetDestinationAddressPrefix {
        chain_id: u64,
        prefix: Option<String>,
    },
    SetGovernance { address: String },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(StatsResponse)]
    Stats {},

    #[returns(bool)]
    IsChainIdSupported { chain_id: u64 },

    #[returns(Vec<u64>)]
    SupportedChainIds {},

    /// Recipient prefix enforced for a destination, if any
    #[returns(Option<String>)]
    DestinationAddressPrefix { chain_id: u64 },

    /// Ordered pending transfer ids and aggregate amount for a destination
    #[returns(PendingTransfersResponse)]
    PendingTransfers { chain_id: u64 },

    #[returns(Uint128)]
    PendingAmount { chain_id: u64 },

    /// Destinations with pending transfers
    #[returns(Vec<u64>)]
    PendingChainIds {},

    /// A root committed on this chain
    #[returns(CommitmentResponse)]
    Commitment { root: Binary },

    /// Inclusion proof of a transfer within a root committed on this chain
    #[returns(MerkleProof)]
    TransferProof { root: Binary, transfer_id: Binary },

    /// A root received by this chain
    #[returns(TransferRootResponse)]
    TransferRoot { root: Binary },

    /// Bond state of a transfer id on this chain
    #[returns(WithdrawalResponse)]
    Withdrawal { transfer_id: Binary },

    /// Bonds still waiting for settlement, for dispute resolution
    #[returns(BondedWithdrawalsResponse)]
    BondedWithdrawals {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    #[returns(BonderResponse)]
    Bonder { address: String },

    #[returns(Binary)]
    ComputeTransferId { transfer: Transfer },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub governance: Addr,
    pub chain_id: u64,
    pub bridge_denom: String,
    pub canonical_denom: String,
    pub exchange: Option<Addr>,
    pub messenger: Option<Addr>,
    pub root_relayer: Addr,
    pub max_pending_transfers: u32,
}

#[cw_serde]
pub struct StatsResponse {
    pub transfers_sent: u64,
    pub roots_committed: u64,
    pub roots_received: u64,
    pub withdrawals_bonded: u64,
    pub withdrawals_settled: u64,
    pub withdrawals_unbonded: u64,
}

#[cw_serde]
pub struct PendingTransfersResponse {
    pub chain_id: u64,
    pub transfer_ids: Vec<Binary>,
    pub amount: Uint128,
}

#[cw_serde]
pub struct CommitmentResponse {
    pub root: Binary,
    pub destination_chain_id: u64,
    pub total_amount: Uint128,
    pub transfer_ids: Vec<Binary>,
    pub committed_at: Timestamp,
}

#[cw_serde]
pub struct TransferRootResponse {
    pub root: Binary,
    pub total_amount: Uint128,
    pub amount_withdrawn: Uint128,
    pub created_at: Timestamp,
}

/// `status` is None while the transfer id is unbonded
#[cw_serde]
pub struct WithdrawalResponse {
    pub transfer_id: Binary,
    pub status: Option<WithdrawalStatus>,
    pub bonder: Option<Addr>,
    pub recipient: Option<Addr>,
    pub amount: Uint128,
    pub relayer_fee: Uint128,
    pub bonded_at: Option<Timestamp>,
    pub settled_root: Option<Binary>,
    pub settled_at: Option<Timestamp>,
}

#[cw_serde]
pub struct BondedWithdrawalEntry {
    pub transfer_id: Binary,
    pub bonder: Addr,
    pub amount: Uint128,
    pub bonded_at: Timestamp,
    /// Seconds since the bond was placed
    pub age_seconds: u64,
}

#[cw_serde]
pub struct BondedWithdrawalsResponse {
    pub withdrawals: Vec<BondedWithdrawalEntry>,
}

#[cw_serde]
pub struct BonderResponse {
    pub address: Addr,
    pub is_bonder: bool,
    pub credit: Uint128,
    pub debit: Uint128,
    pub available: Uint128,
}
