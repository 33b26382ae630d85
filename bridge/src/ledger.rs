//! Pending-transfer ledger.
//!
//! Per destination chain, an ordered arena of transfer ids awaiting commitment
//! plus a running total. The arena is bounded: the append that would exceed
//! the configured maximum fails and leaves the batch untouched.

use cosmwasm_std::{Order, StdResult, Storage, Uint128};

use common::Bytes32;

use crate::error::ContractError;
use crate::state::{PendingBatch, PENDING_BATCHES, PENDING_TRANSFER_IDS};

/// Snapshot of one destination's pending batch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingTransfers {
    pub transfer_ids: Vec<Bytes32>,
    pub amount: Uint128,
}

impl PendingTransfers {
    pub fn is_empty(&self) -> bool {
        self.transfer_ids.is_empty()
    }
}

/// Append `transfer_id` to the batch for `chain_id`
pub fn append(
    storage: &mut dyn Storage,
    chain_id: u64,
    transfer_id: &Bytes32,
    amount: Uint128,
    max: u32,
) -> Result<PendingBatch, ContractError> {
    let mut batch = PENDING_BATCHES
        .may_load(storage, chain_id)?
        .unwrap_or_default();

    if batch.count >= max {
        return Err(ContractError::BatchOverflow { chain_id, max });
    }

    let amount = batch.amount.checked_add(amount).map_err(cosmwasm_std::StdError::from)?;

    PENDING_TRANSFER_IDS.save(storage, (chain_id, batch.count), transfer_id)?;
    batch.count += 1;
    batch.amount = amount;
    PENDING_BATCHES.save(storage, chain_id, &batch)?;

    Ok(batch)
}

/// Ordered pending ids and their aggregate amount
pub fn peek(storage: &dyn Storage, chain_id: u64) -> StdResult<PendingTransfers> {
    let Some(batch) = PENDING_BATCHES.may_load(storage, chain_id)? else {
        return Ok(PendingTransfers::default());
    };

    let transfer_ids = PENDING_TRANSFER_IDS
        .prefix(chain_id)
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, id)| id))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(PendingTransfers {
        transfer_ids,
        amount: batch.amount,
    })
}

/// Aggregate pending amount for `chain_id`
pub fn pending_amount(storage: &dyn Storage, chain_id: u64) -> StdResult<Uint128> {
    Ok(PENDING_BATCHES
        .may_load(storage, chain_id)?
        .map(|batch| batch.amount)
        .unwrap_or_default())
}

/// Destinations with at least one pending transfer, ascending
pub fn pending_chain_ids(storage: &dyn Storage) -> StdResult<Vec<u64>> {
    PENDING_BATCHES
        .keys(storage, None, None, Order::Ascending)
        .collect()
}

/// Take the whole batch for `chain_id`, leaving it empty
pub(crate) fn drain(storage: &mut dyn Storage, chain_id: u64) -> StdResult<PendingTransfers> {
    let pending = peek(storage, chain_id)?;

    for index in 0..pending.transfer_ids.len() as u32 {
        PENDING_TRANSFER_IDS.remove(storage, (chain_id, index));
    }
    PENDING_BATCHES.remove(storage, chain_id);

    Ok(pending)
}
