//! Query handlers for the bonded bridge contract.
//!
//! This module contains all query message handlers for retrieving contract state.

use cosmwasm_std::{Binary, Deps, Env, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use common::hash::binary_to_bytes32;
use common::{MerkleProof, MerkleTree, Transfer};

use crate::ledger;
use crate::msg::{
    BondedWithdrawalEntry, BondedWithdrawalsResponse, BonderResponse, CommitmentResponse,
    ConfigResponse, PendingTransfersResponse, StatsResponse, TransferRootResponse,
    WithdrawalResponse,
};
use crate::state::{
    BONDED_WITHDRAWALS, BONDERS, COMMITMENTS, CONFIG, DEFAULT_LIMIT,
    DESTINATION_ADDRESS_PREFIXES, MAX_LIMIT, STATS, SUPPORTED_CHAIN_IDS, TRANSFER_ROOTS,
    WITHDRAWALS,
};

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        governance: config.governance,
        chain_id: config.chain_id,
        bridge_denom: config.bridge_denom,
        canonical_denom: config.canonical_denom,
        exchange: config.exchange,
        messenger: config.messenger,
        root_relayer: config.root_relayer,
        max_pending_transfers: config.max_pending_transfers,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        transfers_sent: stats.transfers_sent,
        roots_committed: stats.roots_committed,
        roots_received: stats.roots_received,
        withdrawals_bonded: stats.withdrawals_bonded,
        withdrawals_settled: stats.withdrawals_settled,
        withdrawals_unbonded: stats.withdrawals_unbonded,
    })
}

pub fn query_is_chain_id_supported(deps: Deps, chain_id: u64) -> StdResult<bool> {
    Ok(SUPPORTED_CHAIN_IDS
        .may_load(deps.storage, chain_id)?
        .unwrap_or(false))
}

pub fn query_supported_chain_ids(deps: Deps) -> StdResult<Vec<u64>> {
    SUPPORTED_CHAIN_IDS
        .keys(deps.storage, None, None, Order::Ascending)
        .collect()
}

pub fn query_destination_address_prefix(deps: Deps, chain_id: u64) -> StdResult<Option<String>> {
    DESTINATION_ADDRESS_PREFIXES.may_load(deps.storage, chain_id)
}

// ============================================================================
// Source Side
// ============================================================================

pub fn query_pending_transfers(deps: Deps, chain_id: u64) -> StdResult<PendingTransfersResponse> {
    let pending = ledger::peek(deps.storage, chain_id)?;
    Ok(PendingTransfersResponse {
        chain_id,
        transfer_ids: pending
            .transfer_ids
            .iter()
            .map(|id| Binary::from(id.to_vec()))
            .collect(),
        amount: pending.amount,
    })
}

pub fn query_pending_amount(deps: Deps, chain_id: u64) -> StdResult<Uint128> {
    ledger::pending_amount(deps.storage, chain_id)
}

pub fn query_pending_chain_ids(deps: Deps) -> StdResult<Vec<u64>> {
    ledger::pending_chain_ids(deps.storage)
}

pub fn query_commitment(deps: Deps, root: Binary) -> StdResult<CommitmentResponse> {
    let key = binary_to_bytes32(&root)?;
    let commitment = COMMITMENTS.load(deps.storage, &key)?;
    Ok(CommitmentResponse {
        root,
        destination_chain_id: commitment.destination_chain_id,
        total_amount: commitment.total_amount,
        transfer_ids: commitment.transfer_ids,
        committed_at: commitment.committed_at,
    })
}

/// Proof that `transfer_id` is a leaf of a root committed here
pub fn query_transfer_proof(deps: Deps, root: Binary, transfer_id: Binary) -> StdResult<MerkleProof> {
    let key = binary_to_bytes32(&root)?;
    let transfer_id = binary_to_bytes32(&transfer_id)?;
    let commitment = COMMITMENTS.load(deps.storage, &key)?;

    let leaves = commitment
        .transfer_ids
        .iter()
        .map(binary_to_bytes32)
        .collect::<StdResult<Vec<_>>>()?;

    MerkleTree::new(&leaves)
        .and_then(|tree| tree.proof_for(&transfer_id))
        .ok_or_else(|| StdError::generic_err("Transfer id is not part of this root"))
}

pub fn query_compute_transfer_id(transfer: Transfer) -> StdResult<Binary> {
    Ok(Binary::from(transfer.transfer_id().to_vec()))
}

// ============================================================================
// Destination Side
// ============================================================================

pub fn query_transfer_root(deps: Deps, root: Binary) -> StdResult<TransferRootResponse> {
    let key = binary_to_bytes32(&root)?;
    let transfer_root = TRANSFER_ROOTS.load(deps.storage, &key)?;
    Ok(TransferRootResponse {
        root,
        total_amount: transfer_root.total,
        amount_withdrawn: transfer_root.withdrawn,
        created_at: transfer_root.created_at,
    })
}

/// Record of a transfer id; an unknown id reports no status
pub fn query_withdrawal(deps: Deps, transfer_id: Binary) -> StdResult<WithdrawalResponse> {
    let key = binary_to_bytes32(&transfer_id)?;

    match WITHDRAWALS.may_load(deps.storage, &key)? {
        Some(record) => Ok(WithdrawalResponse {
            transfer_id,
            status: Some(record.status),
            bonder: record.bonder,
            recipient: Some(record.recipient),
            amount: record.amount,
            relayer_fee: record.relayer_fee,
            bonded_at: record.bonded_at,
            settled_root: record.settled_root,
            settled_at: record.settled_at,
        }),
        None => Ok(WithdrawalResponse {
            transfer_id,
            status: None,
            bonder: None,
            recipient: None,
            amount: Uint128::zero(),
            relayer_fee: Uint128::zero(),
            bonded_at: None,
            settled_root: None,
            settled_at: None,
        }),
    }
}

/// Bonds still waiting for their root, keyed by transfer id
pub fn query_bonded_withdrawals(
    deps: Deps,
    env: Env,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<BondedWithdrawalsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_ref().map(|b| Bound::exclusive(b.as_slice()));

    let now = env.block.time.seconds();
    let withdrawals = BONDED_WITHDRAWALS
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|id| {
            let id = id?;
            let record = WITHDRAWALS.load(deps.storage, &id)?;
            let (bonder, bonded_at) = record
                .bonder
                .zip(record.bonded_at)
                .ok_or_else(|| StdError::generic_err("Bonded withdrawal without bond data"))?;
            Ok(BondedWithdrawalEntry {
                transfer_id: Binary::from(id),
                bonder,
                amount: record.amount,
                bonded_at,
                age_seconds: now.saturating_sub(bonded_at.seconds()),
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(BondedWithdrawalsResponse { withdrawals })
}

pub fn query_bonder(deps: Deps, address: String) -> StdResult<BonderResponse> {
    let address = deps.api.addr_validate(&address)?;
    let account = BONDERS.may_load(deps.storage, &address)?;

    Ok(BonderResponse {
        is_bonder: account.is_some(),
        credit: account.as_ref().map(|a| a.credit).unwrap_or_default(),
        debit: account.as_ref().map(|a| a.debit).unwrap_or_default(),
        available: account.as_ref().map(|a| a.available()).unwrap_or_default(),
        address,
    })
}
