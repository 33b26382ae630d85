//! State definitions for the bonded bridge contract
//!
//! Source side: pending-transfer ledger and emitted commitments.
//! Destination side: root registry, withdrawal records and bonder accounts.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Empty, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Governance address for contract management
    pub governance: Addr,
    /// Identifier of the chain this bridge is deployed on
    pub chain_id: u64,
    /// Denom of the bridge token that transfers are denominated in
    pub bridge_denom: String,
    /// Denom of the canonical asset the exchange converts to and from
    pub canonical_denom: String,
    /// Swap collaborator (None = swaps disabled)
    pub exchange: Option<Addr>,
    /// Outbound cross-domain channel (None = roots are only emitted as events)
    pub messenger: Option<Addr>,
    /// Only sender allowed to deliver transfer roots to this chain
    pub root_relayer: Addr,
    /// Maximum pending transfers per destination before a commit is required
    pub max_pending_transfers: u32,
}

/// Bridge statistics
#[cw_serde]
#[derive(Default)]
pub struct Stats {
    pub transfers_sent: u64,
    pub roots_committed: u64,
    pub roots_received: u64,
    pub withdrawals_bonded: u64,
    pub withdrawals_settled: u64,
    pub withdrawals_unbonded: u64,
}

// ============================================================================
// Source Side
// ============================================================================

/// Running header of one destination's pending batch
#[cw_serde]
#[derive(Default)]
pub struct PendingBatch {
    /// Number of transfer ids stored in `PENDING_TRANSFER_IDS`
    pub count: u32,
    /// Sum of the pending transfers' gross amounts
    pub amount: Uint128,
}

/// A root emitted by this chain's commitment engine
#[cw_serde]
pub struct Commitment {
    pub destination_chain_id: u64,
    pub total_amount: Uint128,
    /// Leaves in the order they were committed
    pub transfer_ids: Vec<Binary>,
    pub committed_at: Timestamp,
}

// ============================================================================
// Destination Side
// ============================================================================

/// A root delivered by the cross-domain channel
#[cw_serde]
pub struct TransferRoot {
    /// Value authorized by the root
    pub total: Uint128,
    /// Value already withdrawn against the root (never exceeds `total`)
    pub withdrawn: Uint128,
    pub created_at: Timestamp,
}

impl TransferRoot {
    pub fn available(&self) -> Uint128 {
        self.total.saturating_sub(self.withdrawn)
    }
}

#[cw_serde]
pub enum WithdrawalStatus {
    /// Fronted by a bonder, waiting for its root
    Bonded,
    /// Bond reconciled against a registered root
    Settled,
    /// Withdrawn directly against a registered root, no bond
    Withdrawn,
}

/// Destination-side record of a transfer id; absent means unbonded
#[cw_serde]
pub struct WithdrawalRecord {
    pub status: WithdrawalStatus,
    /// Bonder who fronted the funds (None for direct withdrawals)
    pub bonder: Option<Addr>,
    pub recipient: Addr,
    pub amount: Uint128,
    pub relayer_fee: Uint128,
    pub bonded_at: Option<Timestamp>,
    pub settled_root: Option<Binary>,
    pub settled_at: Option<Timestamp>,
}

/// Collateral accounting for one bonder
#[cw_serde]
#[derive(Default)]
pub struct BonderAccount {
    /// Posted collateral
    pub credit: Uint128,
    /// Outstanding (unsettled) bonds
    pub debit: Uint128,
}

impl BonderAccount {
    pub fn available(&self) -> Uint128 {
        self.credit.saturating_sub(self.debit)
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:bonded-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default cap on pending transfers per destination (MAX_NUM_SENDS_BEFORE_COMMIT)
pub const DEFAULT_MAX_PENDING_TRANSFERS: u32 = 100;

/// Default page size for paginated queries
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum page size for paginated queries
pub const MAX_LIMIT: u32 = 50;

// ============================================================================
// Core State Storage
// ============================================================================

pub const CONFIG: Item<Config> = Item::new("config");

pub const STATS: Item<Stats> = Item::new("stats");

/// Destinations accepted by `Send`
/// Key: chain_id, Value: enabled
pub const SUPPORTED_CHAIN_IDS: Map<u64, bool> = Map::new("supported_chain_ids");

/// Bech32 prefix recipients on a destination must carry (unset = not checked)
/// Key: chain_id, Value: human-readable part
pub const DESTINATION_ADDRESS_PREFIXES: Map<u64, String> =
    Map::new("destination_address_prefixes");

// ============================================================================
// Source Side Storage
// ============================================================================

/// Pending transfer ids, an arena indexed by position within the batch
/// Key: (destination chain_id, index), Value: transfer id
pub const PENDING_TRANSFER_IDS: Map<(u64, u32), [u8; 32]> = Map::new("pending_transfer_ids");

/// Pending batch headers
/// Key: destination chain_id, Value: PendingBatch
pub const PENDING_BATCHES: Map<u64, PendingBatch> = Map::new("pending_batches");

/// Every transfer id sent from this chain
/// Key: transfer id, Value: destination chain_id
pub const SENT_TRANSFERS: Map<&[u8], u64> = Map::new("sent_transfers");

/// Roots committed on this chain
/// Key: root, Value: Commitment
pub const COMMITMENTS: Map<&[u8], Commitment> = Map::new("commitments");

// ============================================================================
// Destination Side Storage
// ============================================================================

/// Root registry
/// Key: root, Value: TransferRoot
pub const TRANSFER_ROOTS: Map<&[u8], TransferRoot> = Map::new("transfer_roots");

/// Withdrawal records (bond state machine)
/// Key: transfer id, Value: WithdrawalRecord
pub const WITHDRAWALS: Map<&[u8], WithdrawalRecord> = Map::new("withdrawals");

/// Bonds waiting for settlement, removed once settled
/// Key: transfer id, Value: Empty
pub const BONDED_WITHDRAWALS: Map<&[u8], Empty> = Map::new("bonded_withdrawals");

/// Registered bonders and their collateral
/// Key: bonder address, Value: BonderAccount
pub const BONDERS: Map<&Addr, BonderAccount> = Map::new("bonders");
