//! Bonded Bridge Contract - Batched Cross-Chain Transfers with Bonded Liquidity
//!
//! Transfers leaving this chain are collected per destination and committed
//! in batches as a single Merkle root. Bonders front the funds on the
//! destination chain before the root arrives and are reconciled once it does.
//!
//! # Outgoing Flow
//! 1. User calls `Send` (or `SwapAndSend`); the bridge tokens are burned and
//!    the transfer id joins the destination's pending ledger
//! 2. A bonder calls `CommitTransfers`; the pending ids become one transfer
//!    root, sent through the messenger with the batch total
//!
//! # Incoming Flow
//! 1. A bonder calls `BondWithdrawal` and pays the recipient out of its
//!    collateral (relayer fee kept by the bonder)
//! 2. The root relayer delivers the root and its funds via `SetTransferRoot`
//! 3. Anyone calls `SettleBondedWithdrawal(s)`; the root's value releases the
//!    bonder's debit
//! 4. Transfers nobody bonded are paid with `Withdraw` and a Merkle proof
//!
//! # Safety
//! - A root can never pay out more than the total it was delivered with
//! - A transfer id is bonded, settled or withdrawn at most once
//! - A bonder's outstanding bonds never exceed its posted collateral

pub mod contract;
pub mod error;
mod execute;
pub mod ledger;
pub mod msg;
mod query;
pub mod registry;
pub mod state;
mod swap;

pub use crate::error::ContractError;
pub use common::{MerkleProof, Transfer};
