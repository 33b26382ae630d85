//! Bonded Bridge Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers
//! - `ledger` / `registry` - Pending transfers and received roots

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_add_bonder, execute_add_supported_chain_ids, execute_bond_withdrawal,
    execute_commit_transfers, execute_remove_bonder, execute_remove_supported_chain_ids,
    execute_send, execute_set_exchange_address, execute_set_governance,
    execute_set_max_pending_transfers, execute_set_messenger_address,
    execute_set_destination_address_prefix, execute_set_root_relayer_address, execute_set_transfer_root, execute_settle_bonded_withdrawal,
    execute_settle_bonded_withdrawals, execute_stake, execute_swap_and_send, execute_unstake,
    execute_withdraw,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_bonded_withdrawals, query_bonder, query_commitment, query_compute_transfer_id,
    query_config, query_destination_address_prefix, query_is_chain_id_supported, query_pending_amount, query_pending_chain_ids,
    query_pending_transfers, query_stats, query_supported_chain_ids, query_transfer_proof,
    query_transfer_root, query_withdrawal,
};
use crate::state::{
    BonderAccount, Config, Stats, BONDERS, CONFIG, CONTRACT_NAME, CONTRACT_VERSION,
    DEFAULT_MAX_PENDING_TRANSFERS, STATS, SUPPORTED_CHAIN_IDS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let governance = deps.api.addr_validate(&msg.governance)?;
    let root_relayer = deps.api.addr_validate(&msg.root_relayer)?;
    let exchange = msg
        .exchange
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    let messenger = msg
        .messenger
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;

    if msg.bridge_denom.is_empty() || msg.canonical_denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "Denoms must not be empty".to_string(),
        });
    }

    let max_pending_transfers = msg
        .max_pending_transfers
        .unwrap_or(DEFAULT_MAX_PENDING_TRANSFERS);
    if max_pending_transfers == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "max_pending_transfers must be greater than zero".to_string(),
        });
    }

    let config = Config {
        governance,
        chain_id: msg.chain_id,
        bridge_denom: msg.bridge_denom,
        canonical_denom: msg.canonical_denom,
        exchange,
        messenger,
        root_relayer,
        max_pending_transfers,
    };
    CONFIG.save(deps.storage, &config)?;
    STATS.save(deps.storage, &Stats::default())?;

    for chain_id in &msg.supported_chain_ids {
        if *chain_id == config.chain_id {
            return Err(ContractError::InvalidConfig {
                reason: format!("Cannot send to this chain ({})", chain_id),
            });
        }
        SUPPORTED_CHAIN_IDS.save(deps.storage, *chain_id, &true)?;
    }

    for bonder in &msg.bonders {
        let bonder = deps.api.addr_validate(bonder)?;
        BONDERS.save(deps.storage, &bonder, &BonderAccount::default())?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("governance", config.governance)
        .add_attribute("chain_id", config.chain_id.to_string())
        .add_attribute("max_pending_transfers", max_pending_transfers.to_string())
        .add_attribute("bonder_count", msg.bonders.len().to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Source side
        ExecuteMsg::Send {
            chain_id,
            recipient,
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min,
            deadline,
        } => execute_send(
            deps,
            info,
            chain_id,
            recipient,
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min,
            deadline,
        ),
        ExecuteMsg::SwapAndSend {
            chain_id,
            recipient,
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min,
            deadline,
            destination_amount_out_min,
            destination_deadline,
        } => execute_swap_and_send(
            deps,
            env,
            info,
            chain_id,
            recipient,
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min,
            deadline,
            destination_amount_out_min,
            destination_deadline,
        ),
        ExecuteMsg::CommitTransfers {
            destination_chain_id,
        } => execute_commit_transfers(deps, env, info, destination_chain_id),

        // Destination side
        ExecuteMsg::SetTransferRoot { root, total_amount } => {
            execute_set_transfer_root(deps, env, info, root, total_amount)
        }
        ExecuteMsg::BondWithdrawal {
            recipient,
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min,
            deadline,
        } => execute_bond_withdrawal(
            deps,
            env,
            info,
            recipient,
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min,
            deadline,
        ),
        ExecuteMsg::SettleBondedWithdrawal {
            transfer_id,
            root,
            proof,
        } => execute_settle_bonded_withdrawal(deps, env, transfer_id, root, proof),
        ExecuteMsg::SettleBondedWithdrawals { root, transfer_ids } => {
            execute_settle_bonded_withdrawals(deps, env, root, transfer_ids)
        }
        ExecuteMsg::Withdraw {
            recipient,
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min,
            deadline,
            root,
            proof,
        } => execute_withdraw(
            deps,
            env,
            info,
            recipient,
            amount,
            transfer_nonce,
            relayer_fee,
            amount_out_min,
            deadline,
            root,
            proof,
        ),

        // Bonder collateral
        ExecuteMsg::Stake {} => execute_stake(deps, info),
        ExecuteMsg::Unstake { amount } => execute_unstake(deps, info, amount),

        // Governance
        ExecuteMsg::AddSupportedChainIds { chain_ids } => {
            execute_add_supported_chain_ids(deps, info, chain_ids)
        }
        ExecuteMsg::RemoveSupportedChainIds { chain_ids } => {
            execute_remove_supported_chain_ids(deps, info, chain_ids)
        }
        ExecuteMsg::AddBonder { address } => execute_add_bonder(deps, info, address),
        ExecuteMsg::RemoveBonder { address } => execute_remove_bonder(deps, info, address),
        ExecuteMsg::SetExchangeAddress { address } => {
            execute_set_exchange_address(deps, info, address)
        }
        ExecuteMsg::SetMessengerAddress { address } => {
            execute_set_messenger_address(deps, info, address)
        }
        ExecuteMsg::SetRootRelayerAddress { address } => {
            execute_set_root_relayer_address(deps, info, address)
        }
        ExecuteMsg::SetMaxPendingTransfers { max } => {
            execute_set_max_pending_transfers(deps, info, max)
        }
        ExecuteMsg::SetDestinationAddressPrefix { chain_id, prefix } => {
            execute_set_destination_address_prefix(deps, info, chain_id, prefix)
        }
        ExecuteMsg::SetGovernance { address } => execute_set_governance(deps, info, address),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::IsChainIdSupported { chain_id } => {
            to_json_binary(&query_is_chain_id_supported(deps, chain_id)?)
        }
        QueryMsg::SupportedChainIds {} => to_json_binary(&query_supported_chain_ids(deps)?),
        QueryMsg::DestinationAddressPrefix { chain_id } => {
            to_json_binary(&query_destination_address_prefix(deps, chain_id)?)
        }
        QueryMsg::PendingTransfers { chain_id } => {
            to_json_binary(&query_pending_transfers(deps, chain_id)?)
        }
        QueryMsg::PendingAmount { chain_id } => {
            to_json_binary(&query_pending_amount(deps, chain_id)?)
        }
        QueryMsg::PendingChainIds {} => to_json_binary(&query_pending_chain_ids(deps)?),
        QueryMsg::Commitment { root } => to_json_binary(&query_commitment(deps, root)?),
        QueryMsg::TransferProof { root, transfer_id } => {
            to_json_binary(&query_transfer_proof(deps, root, transfer_id)?)
        }
        QueryMsg::TransferRoot { root } => to_json_binary(&query_transfer_root(deps, root)?),
        QueryMsg::Withdrawal { transfer_id } => {
            to_json_binary(&query_withdrawal(deps, transfer_id)?)
        }
        QueryMsg::BondedWithdrawals { start_after, limit } => {
            to_json_binary(&query_bonded_withdrawals(deps, env, start_after, limit)?)
        }
        QueryMsg::Bonder { address } => to_json_binary(&query_bonder(deps, address)?),
        QueryMsg::ComputeTransferId { transfer } => {
            to_json_binary(&query_compute_transfer_id(transfer)?)
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
