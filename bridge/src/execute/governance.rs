//! Governance handlers.
//!
//! This module handles:
//! - Supported destination chains and their recipient prefixes
//! - Bonder registration
//! - Collaborator addresses (exchange, messenger, root relayer)
//! - Batch cap and governance transfer

use cosmwasm_std::{BankMsg, Coin, DepsMut, MessageInfo, Response, Storage};

use crate::error::ContractError;
use crate::state::{
    BonderAccount, Config, BONDERS, CONFIG, DESTINATION_ADDRESS_PREFIXES, SUPPORTED_CHAIN_IDS,
};

fn ensure_governance(storage: &dyn Storage, info: &MessageInfo) -> Result<Config, ContractError> {
    let config = CONFIG.load(storage)?;
    if info.sender != config.governance {
        return Err(ContractError::Unauthorized);
    }
    Ok(config)
}

fn join_chain_ids(chain_ids: &[u64]) -> String {
    chain_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

// ============================================================================
// Supported Chains
// ============================================================================

pub fn execute_add_supported_chain_ids(
    deps: DepsMut,
    info: MessageInfo,
    chain_ids: Vec<u64>,
) -> Result<Response, ContractError> {
    let config = ensure_governance(deps.storage, &info)?;

    for chain_id in &chain_ids {
        if *chain_id == config.chain_id {
            return Err(ContractError::InvalidConfig {
                reason: format!("Cannot send to this chain ({})", chain_id),
            });
        }
        SUPPORTED_CHAIN_IDS.save(deps.storage, *chain_id, &true)?;
    }

    Ok(Response::new()
        .add_attribute("method", "add_supported_chain_ids")
        .add_attribute("chain_ids", join_chain_ids(&chain_ids)))
}

/// Disable destinations. Transfers already pending for them can still be committed.
pub fn execute_remove_supported_chain_ids(
    deps: DepsMut,
    info: MessageInfo,
    chain_ids: Vec<u64>,
) -> Result<Response, ContractError> {
    ensure_governance(deps.storage, &info)?;

    for chain_id in &chain_ids {
        SUPPORTED_CHAIN_IDS.remove(deps.storage, *chain_id);
    }

    Ok(Response::new()
        .add_attribute("method", "remove_supported_chain_ids")
        .add_attribute("chain_ids", join_chain_ids(&chain_ids)))
}

pub fn execute_set_destination_address_prefix(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    prefix: Option<String>,
) -> Result<Response, ContractError> {
    ensure_governance(deps.storage, &info)?;

    match &prefix {
        Some(prefix) => {
            if prefix.is_empty()
                || !prefix
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            {
                return Err(ContractError::InvalidConfig {
                    reason: format!("Invalid address prefix: {:?}", prefix),
                });
            }
            DESTINATION_ADDRESS_PREFIXES.save(deps.storage, chain_id, prefix)?;
        }
        None => DESTINATION_ADDRESS_PREFIXES.remove(deps.storage, chain_id),
    }

    Ok(Response::new()
        .add_attribute("method", "set_destination_address_prefix")
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("prefix", prefix.unwrap_or_default()))
}

// ============================================================================
// Bonders
// ============================================================================

pub fn execute_add_bonder(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_governance(deps.storage, &info)?;

    let bonder = deps.api.addr_validate(&address)?;
    if BONDERS.has(deps.storage, &bonder) {
        return Err(ContractError::BonderAlreadyRegistered);
    }
    BONDERS.save(deps.storage, &bonder, &BonderAccount::default())?;

    Ok(Response::new()
        .add_attribute("method", "add_bonder")
        .add_attribute("bonder", bonder))
}

/// Deregister a bonder with no outstanding bonds, returning its collateral
pub fn execute_remove_bonder(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let config = ensure_governance(deps.storage, &info)?;

    let bonder = deps.api.addr_validate(&address)?;
    let account = BONDERS
        .may_load(deps.storage, &bonder)?
        .ok_or(ContractError::BonderNotRegistered)?;
    if !account.debit.is_zero() {
        return Err(ContractError::BonderHasOutstandingBonds {
            debit: account.debit,
        });
    }
    BONDERS.remove(deps.storage, &bonder);

    let mut response = Response::new()
        .add_attribute("method", "remove_bonder")
        .add_attribute("bonder", bonder.as_str())
        .add_attribute("returned_credit", account.credit.to_string());

    if !account.credit.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: bonder.to_string(),
            amount: vec![Coin {
                denom: config.bridge_denom,
                amount: account.credit,
            }],
        });
    }

    Ok(response)
}

// ============================================================================
// Collaborators
// ============================================================================

pub fn execute_set_exchange_address(
    deps: DepsMut,
    info: MessageInfo,
    address: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = ensure_governance(deps.storage, &info)?;

    config.exchange = address
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_exchange_address")
        .add_attribute(
            "exchange",
            config
                .exchange
                .map(|a| a.to_string())
                .unwrap_or_else(|| "none".to_string()),
        ))
}

pub fn execute_set_messenger_address(
    deps: DepsMut,
    info: MessageInfo,
    address: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = ensure_governance(deps.storage, &info)?;

    config.messenger = address
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_messenger_address")
        .add_attribute(
            "messenger",
            config
                .messenger
                .map(|a| a.to_string())
                .unwrap_or_else(|| "none".to_string()),
        ))
}

pub fn execute_set_root_relayer_address(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = ensure_governance(deps.storage, &info)?;

    config.root_relayer = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_root_relayer_address")
        .add_attribute("root_relayer", config.root_relayer))
}

// ============================================================================
// Limits & Governance Transfer
// ============================================================================

/// Lowering the cap below a batch's current size only blocks further sends
/// to that destination until it is committed.
pub fn execute_set_max_pending_transfers(
    deps: DepsMut,
    info: MessageInfo,
    max: u32,
) -> Result<Response, ContractError> {
    let mut config = ensure_governance(deps.storage, &info)?;

    if max == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "max_pending_transfers must be greater than zero".to_string(),
        });
    }
    config.max_pending_transfers = max;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_max_pending_transfers")
        .add_attribute("max", max.to_string()))
}

pub fn execute_set_governance(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = ensure_governance(deps.storage, &info)?;

    config.governance = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_governance")
        .add_attribute("governance", config.governance))
}
