//! Bonding and settlement (destination side).
//!
//! A bonder fronts a transfer to its recipient out of posted collateral before
//! the transfer's root arrives. Once the root is registered the bond is
//! settled against it: the root's value replaces the collateral and the
//! bonder's debit is released.
//!
//! Record states move one way only: (none) -> Bonded -> Settled. A transfer
//! withdrawn directly goes (none) -> Withdrawn.

use cosmwasm_std::{
    Addr, BankMsg, Binary, Coin, CosmosMsg, Deps, DepsMut, Empty, Env, Event, MessageInfo,
    Response, StdError, Storage, Uint128,
};

use common::{bytes32_to_hex, compute_root, verify_proof, Bytes32, MerkleProof, Transfer};

use crate::error::ContractError;
use crate::execute::parse_hash;
use crate::registry;
use crate::state::{
    Config, WithdrawalRecord, WithdrawalStatus, BONDED_WITHDRAWALS, BONDERS, CONFIG, STATS,
    WITHDRAWALS,
};
use crate::swap::{payout_with_attempted_swap, Payout};

// ============================================================================
// Bond
// ============================================================================

/// Pay out a transfer addressed to this chain ahead of its root
#[allow(clippy::too_many_arguments)]
pub fn execute_bond_withdrawal(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
    transfer_nonce: u64,
    relayer_fee: Uint128,
    amount_out_min: Uint128,
    deadline: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut account = BONDERS
        .may_load(deps.storage, &info.sender)?
        .ok_or(ContractError::UnauthorizedBonder)?;

    let (transfer, recipient_addr) = incoming_transfer(
        deps.as_ref(),
        &config,
        recipient,
        amount,
        transfer_nonce,
        relayer_fee,
        amount_out_min,
        deadline,
    )?;
    let transfer_id = transfer.transfer_id();
    ensure_unrecorded(deps.storage, &transfer_id)?;

    let required = account.debit.checked_add(amount).map_err(StdError::from)?;
    if required > account.credit {
        return Err(ContractError::InsufficientBond {
            required: amount,
            available: account.available(),
        });
    }
    account.debit = required;
    BONDERS.save(deps.storage, &info.sender, &account)?;

    WITHDRAWALS.save(
        deps.storage,
        &transfer_id,
        &WithdrawalRecord {
            status: WithdrawalStatus::Bonded,
            bonder: Some(info.sender.clone()),
            recipient: recipient_addr.clone(),
            amount,
            relayer_fee,
            bonded_at: Some(env.block.time),
            settled_root: None,
            settled_at: None,
        },
    )?;
    BONDED_WITHDRAWALS.save(deps.storage, &transfer_id, &Empty {})?;

    let mut stats = STATS.load(deps.storage)?;
    stats.withdrawals_bonded += 1;
    STATS.save(deps.storage, &stats)?;

    let (messages, payout) = pay_transfer(
        deps.as_ref(),
        &env,
        &config,
        &transfer,
        &recipient_addr,
        &info.sender,
    )?;

    let event = Event::new("transfer_bonded")
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("bonder", info.sender.as_str())
        .add_attribute("recipient", recipient_addr.as_str())
        .add_attribute("amount", amount.to_string())
        .add_attribute("relayer_fee", relayer_fee.to_string())
        .add_attribute("swap", payout.as_str());

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", "bond_withdrawal")
        .add_attribute("bonder_debit", account.debit.to_string())
        .set_data(Binary::from(transfer_id.to_vec())))
}

// ============================================================================
// Settle
// ============================================================================

/// Settle one bonded withdrawal with an inclusion proof
pub fn execute_settle_bonded_withdrawal(
    deps: DepsMut,
    env: Env,
    transfer_id: Binary,
    root: Binary,
    proof: MerkleProof,
) -> Result<Response, ContractError> {
    let transfer_id = parse_hash(&transfer_id)?;
    let root = parse_hash(&root)?;

    let record = match WITHDRAWALS.may_load(deps.storage, &transfer_id)? {
        Some(record) if record.status == WithdrawalStatus::Bonded => record,
        Some(record) => return Err(already_recorded(&record.status, &transfer_id)),
        None => {
            return Err(ContractError::NotBonded {
                transfer_id: bytes32_to_hex(&transfer_id),
            })
        }
    };

    registry::load(deps.storage, &root)?;
    if !verify_proof(&root, &transfer_id, &proof) {
        return Err(ContractError::InvalidProof);
    }

    let record = settle_bond(deps.storage, &env, &root, &transfer_id, record)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.withdrawals_settled += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_event(settled_event(&transfer_id, &root, &record))
        .add_attribute("method", "settle_bonded_withdrawal"))
}

/// Settle every bonded withdrawal of `root` given its full leaf list
pub fn execute_settle_bonded_withdrawals(
    deps: DepsMut,
    env: Env,
    root: Binary,
    transfer_ids: Vec<Binary>,
) -> Result<Response, ContractError> {
    let root = parse_hash(&root)?;
    let transfer_ids = transfer_ids
        .iter()
        .map(parse_hash)
        .collect::<Result<Vec<_>, _>>()?;

    registry::load(deps.storage, &root)?;
    if compute_root(&transfer_ids) != Some(root) {
        return Err(ContractError::InvalidProof);
    }

    let mut events = vec![];
    let mut settled_amount = Uint128::zero();
    for transfer_id in &transfer_ids {
        let record = match WITHDRAWALS.may_load(deps.storage, transfer_id)? {
            Some(record) if record.status == WithdrawalStatus::Bonded => record,
            _ => continue,
        };
        let record = settle_bond(deps.storage, &env, &root, transfer_id, record)?;
        settled_amount += record.amount;
        events.push(settled_event(transfer_id, &root, &record));
    }

    if events.is_empty() {
        return Err(ContractError::NothingToSettle);
    }

    let mut stats = STATS.load(deps.storage)?;
    stats.withdrawals_settled += events.len() as u64;
    STATS.save(deps.storage, &stats)?;

    let settled_count = events.len();
    Ok(Response::new()
        .add_events(events)
        .add_attribute("method", "settle_bonded_withdrawals")
        .add_attribute("root", bytes32_to_hex(&root))
        .add_attribute("settled_count", settled_count.to_string())
        .add_attribute("settled_amount", settled_amount.to_string()))
}

fn settle_bond(
    storage: &mut dyn Storage,
    env: &Env,
    root: &Bytes32,
    transfer_id: &Bytes32,
    mut record: WithdrawalRecord,
) -> Result<WithdrawalRecord, ContractError> {
    let bonder = record
        .bonder
        .clone()
        .ok_or_else(|| ContractError::NotBonded {
            transfer_id: bytes32_to_hex(transfer_id),
        })?;

    registry::record_withdrawal(storage, root, record.amount)?;

    let mut account = BONDERS.load(storage, &bonder)?;
    account.debit = account
        .debit
        .checked_sub(record.amount)
        .map_err(StdError::from)?;
    BONDERS.save(storage, &bonder, &account)?;

    record.status = WithdrawalStatus::Settled;
    record.settled_root = Some(Binary::from(root.to_vec()));
    record.settled_at = Some(env.block.time);
    WITHDRAWALS.save(storage, transfer_id, &record)?;
    BONDED_WITHDRAWALS.remove(storage, transfer_id);

    Ok(record)
}

fn settled_event(transfer_id: &Bytes32, root: &Bytes32, record: &WithdrawalRecord) -> Event {
    let bonder = record
        .bonder
        .as_ref()
        .map(|b| b.to_string())
        .unwrap_or_default();
    Event::new("transfer_settled")
        .add_attribute("transfer_id", bytes32_to_hex(transfer_id))
        .add_attribute("root", bytes32_to_hex(root))
        .add_attribute("bonder", bonder)
        .add_attribute("amount", record.amount.to_string())
}

// ============================================================================
// Shared with direct withdrawals
// ============================================================================

/// Rebuild an incoming transfer addressed to this chain
#[allow(clippy::too_many_arguments)]
pub(crate) fn incoming_transfer(
    deps: Deps,
    config: &Config,
    recipient: String,
    amount: Uint128,
    transfer_nonce: u64,
    relayer_fee: Uint128,
    amount_out_min: Uint128,
    deadline: u64,
) -> Result<(Transfer, Addr), ContractError> {
    if amount.is_zero() || amount <= relayer_fee {
        return Err(ContractError::InvalidAmount {
            reason: format!("Amount {} must exceed relayer fee {}", amount, relayer_fee),
        });
    }

    let recipient_addr = deps
        .api
        .addr_validate(&recipient)
        .map_err(|e| ContractError::InvalidAddress {
            reason: e.to_string(),
        })?;

    let transfer = Transfer {
        chain_id: config.chain_id,
        recipient,
        amount,
        transfer_nonce,
        relayer_fee,
        amount_out_min,
        deadline,
    };
    Ok((transfer, recipient_addr))
}

/// Fail if `transfer_id` already has a record on this chain
pub(crate) fn ensure_unrecorded(
    storage: &dyn Storage,
    transfer_id: &Bytes32,
) -> Result<(), ContractError> {
    match WITHDRAWALS.may_load(storage, transfer_id)? {
        Some(record) => Err(already_recorded(&record.status, transfer_id)),
        None => Ok(()),
    }
}

fn already_recorded(status: &WithdrawalStatus, transfer_id: &Bytes32) -> ContractError {
    let transfer_id = bytes32_to_hex(transfer_id);
    match status {
        WithdrawalStatus::Bonded => ContractError::AlreadyBonded { transfer_id },
        WithdrawalStatus::Settled => ContractError::AlreadySettled { transfer_id },
        WithdrawalStatus::Withdrawn => ContractError::AlreadyWithdrawn { transfer_id },
    }
}

/// Relayer fee to `fee_recipient`, the rest to the recipient
pub(crate) fn pay_transfer(
    deps: Deps,
    env: &Env,
    config: &Config,
    transfer: &Transfer,
    recipient: &Addr,
    fee_recipient: &Addr,
) -> Result<(Vec<CosmosMsg>, Payout), ContractError> {
    let mut messages = vec![];
    if !transfer.relayer_fee.is_zero() {
        messages.push(CosmosMsg::Bank(BankMsg::Send {
            to_address: fee_recipient.to_string(),
            amount: vec![Coin {
                denom: config.bridge_denom.clone(),
                amount: transfer.relayer_fee,
            }],
        }));
    }

    let (payout_messages, payout) = payout_with_attempted_swap(
        deps,
        env,
        config,
        recipient,
        transfer.amount_after_fee(),
        transfer.amount_out_min,
        transfer.deadline,
    )?;
    messages.extend(payout_messages);

    Ok((messages, payout))
}
