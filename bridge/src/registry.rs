//! Root registry (destination side).
//!
//! Stores each delivered root with the value it authorizes and the value
//! already withdrawn against it. `record_withdrawal` is the only path that
//! moves value out of a root.

use cosmwasm_std::{StdResult, Storage, Timestamp, Uint128};

use common::{bytes32_to_hex, Bytes32};

use crate::error::ContractError;
use crate::state::{TransferRoot, TRANSFER_ROOTS};

/// Register a root delivered by the cross-domain channel
pub fn register(
    storage: &mut dyn Storage,
    root: &Bytes32,
    total: Uint128,
    now: Timestamp,
) -> Result<TransferRoot, ContractError> {
    if TRANSFER_ROOTS.has(storage, root) {
        return Err(ContractError::DuplicateRoot {
            root: bytes32_to_hex(root),
        });
    }
    if total.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Transfer root must authorize a non-zero amount".to_string(),
        });
    }

    let transfer_root = TransferRoot {
        total,
        withdrawn: Uint128::zero(),
        created_at: now,
    };
    TRANSFER_ROOTS.save(storage, root, &transfer_root)?;
    Ok(transfer_root)
}

pub fn load(storage: &dyn Storage, root: &Bytes32) -> Result<TransferRoot, ContractError> {
    TRANSFER_ROOTS
        .may_load(storage, root)?
        .ok_or_else(|| ContractError::UnknownRoot {
            root: bytes32_to_hex(root),
        })
}

/// Value authorized by `root` (zero if unknown)
pub fn authorized_amount(storage: &dyn Storage, root: &Bytes32) -> StdResult<Uint128> {
    Ok(TRANSFER_ROOTS
        .may_load(storage, root)?
        .map(|r| r.total)
        .unwrap_or_default())
}

/// Value already withdrawn against `root` (zero if unknown)
pub fn withdrawn_amount(storage: &dyn Storage, root: &Bytes32) -> StdResult<Uint128> {
    Ok(TRANSFER_ROOTS
        .may_load(storage, root)?
        .map(|r| r.withdrawn)
        .unwrap_or_default())
}

/// Debit `amount` from `root`, refusing to exceed the authorized total
pub fn record_withdrawal(
    storage: &mut dyn Storage,
    root: &Bytes32,
    amount: Uint128,
) -> Result<TransferRoot, ContractError> {
    let mut transfer_root = load(storage, root)?;

    let available = transfer_root.available();
    if amount > available {
        return Err(ContractError::RootOverdrawn {
            root: bytes32_to_hex(root),
            requested: amount,
            available,
        });
    }

    transfer_root.withdrawn += amount;
    TRANSFER_ROOTS.save(storage, root, &transfer_root)?;
    Ok(transfer_root)
}
