//! Outgoing transfer handlers (Send and SwapAndSend).
//!
//! A send burns the user's bridge tokens on this chain and records the
//! transfer id in the pending ledger of its destination. The value reappears
//! on the destination chain once the id's root is delivered there.

use cosmwasm_std::{
    BankMsg, Binary, Coin, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response, Storage,
    Uint128,
};

use common::{bytes32_to_hex, Transfer};

use crate::error::ContractError;
use crate::execute::must_pay_exact;
use crate::ledger;
use crate::state::{
    Config, CONFIG, DESTINATION_ADDRESS_PREFIXES, SENT_TRANSFERS, STATS, SUPPORTED_CHAIN_IDS,
};
use crate::swap::swap_canonical_for_bridge;

/// Send bridge tokens to `chain_id`
#[allow(clippy::too_many_arguments)]
pub fn execute_send(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    recipient: String,
    amount: Uint128,
    transfer_nonce: u64,
    relayer_fee: Uint128,
    amount_out_min: Uint128,
    deadline: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let transfer = Transfer {
        chain_id,
        recipient,
        amount,
        transfer_nonce,
        relayer_fee,
        amount_out_min,
        deadline,
    };
    validate_transfer(deps.storage, &transfer)?;
    must_pay_exact(&info, &config.bridge_denom, amount)?;

    record_send(deps.storage, &config, &transfer, vec![], "send")
}

/// Swap attached canonical tokens into bridge tokens, then send them
#[allow(clippy::too_many_arguments)]
pub fn execute_swap_and_send(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    chain_id: u64,
    recipient: String,
    amount: Uint128,
    transfer_nonce: u64,
    relayer_fee: Uint128,
    amount_out_min: Uint128,
    deadline: u64,
    destination_amount_out_min: Uint128,
    destination_deadline: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    // Validate against the requested amount first, the swap only shrinks it
    validate_transfer(
        deps.storage,
        &Transfer {
            chain_id,
            recipient: recipient.clone(),
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min: destination_amount_out_min,
            deadline: destination_deadline,
        },
    )?;
    must_pay_exact(&info, &config.canonical_denom, amount)?;

    let (amount_out, swap) = swap_canonical_for_bridge(
        deps.as_ref(),
        &env,
        &config,
        amount,
        amount_out_min,
        deadline,
    )?;

    let transfer = Transfer {
        chain_id,
        recipient,
        amount: amount_out,
        transfer_nonce,
        relayer_fee,
        amount_out_min: destination_amount_out_min,
        deadline: destination_deadline,
    };
    validate_transfer(deps.storage, &transfer)?;

    record_send(deps.storage, &config, &transfer, vec![swap], "swap_and_send")
}

fn validate_transfer(storage: &dyn Storage, transfer: &Transfer) -> Result<(), ContractError> {
    let supported = SUPPORTED_CHAIN_IDS
        .may_load(storage, transfer.chain_id)?
        .unwrap_or(false);
    if !supported {
        return Err(ContractError::UnsupportedDestination {
            chain_id: transfer.chain_id,
        });
    }

    if transfer.amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Amount must be greater than zero".to_string(),
        });
    }

    if transfer.amount <= transfer.relayer_fee {
        return Err(ContractError::InvalidAmount {
            reason: format!(
                "Amount {} must exceed relayer fee {}",
                transfer.amount, transfer.relayer_fee
            ),
        });
    }

    if transfer.recipient.trim().is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "Recipient must not be empty".to_string(),
        });
    }

    if let Some(prefix) = DESTINATION_ADDRESS_PREFIXES.may_load(storage, transfer.chain_id)? {
        check_recipient_format(&transfer.recipient, &prefix)?;
    }

    Ok(())
}

/// Recipient must be `<prefix>1` followed by lowercase alphanumerics
fn check_recipient_format(recipient: &str, prefix: &str) -> Result<(), ContractError> {
    let data = recipient
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('1'))
        .ok_or_else(|| ContractError::InvalidAddress {
            reason: format!("Recipient {} must start with {}1", recipient, prefix),
        })?;

    if data.is_empty()
        || !data
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(ContractError::InvalidAddress {
            reason: format!("Recipient {} is not a lowercase bech32 address", recipient),
        });
    }
    Ok(())
}

/// Append the transfer to the ledger and burn the bridge tokens backing it
fn record_send(
    storage: &mut dyn Storage,
    config: &Config,
    transfer: &Transfer,
    mut messages: Vec<CosmosMsg>,
    action: &str,
) -> Result<Response, ContractError> {
    let transfer_id = transfer.transfer_id();
    if SENT_TRANSFERS.has(storage, &transfer_id) {
        return Err(ContractError::TransferAlreadySent {
            transfer_id: bytes32_to_hex(&transfer_id),
        });
    }

    let batch = ledger::append(
        storage,
        transfer.chain_id,
        &transfer_id,
        transfer.amount,
        config.max_pending_transfers,
    )?;
    SENT_TRANSFERS.save(storage, &transfer_id, &transfer.chain_id)?;

    let mut stats = STATS.load(storage)?;
    stats.transfers_sent += 1;
    STATS.save(storage, &stats)?;

    messages.push(CosmosMsg::Bank(BankMsg::Burn {
        amount: vec![Coin {
            denom: config.bridge_denom.clone(),
            amount: transfer.amount,
        }],
    }));

    let event = Event::new("transfer_sent")
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("recipient", &transfer.recipient)
        .add_attribute("amount", transfer.amount.to_string())
        .add_attribute("transfer_nonce", transfer.transfer_nonce.to_string())
        .add_attribute("relayer_fee", transfer.relayer_fee.to_string())
        .add_attribute("chain_id", transfer.chain_id.to_string());

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", action)
        .add_attribute("pending_count", batch.count.to_string())
        .add_attribute("pending_amount", batch.amount.to_string())
        .set_data(Binary::from(transfer_id.to_vec())))
}
