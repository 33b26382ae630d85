//! Commitment engine.
//!
//! Freezes one destination's pending ledger into a Merkle root and hands the
//! root to the cross-domain channel. Delivery is fire-and-forget.

use cosmwasm_std::{
    to_json_binary, Binary, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response, WasmMsg,
};

use common::messenger::{CrossDomainMessage, MessengerExecuteMsg};
use common::{bytes32_to_hex, MerkleTree};

use crate::error::ContractError;
use crate::ledger;
use crate::state::{Commitment, BONDERS, COMMITMENTS, CONFIG, STATS};

/// Commit every pending transfer for `destination_chain_id`
pub fn execute_commit_transfers(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    destination_chain_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if info.sender != config.governance && !BONDERS.has(deps.storage, &info.sender) {
        return Err(ContractError::UnauthorizedBonder);
    }

    let pending = ledger::drain(deps.storage, destination_chain_id)?;
    let tree = MerkleTree::new(&pending.transfer_ids).ok_or(ContractError::NothingToCommit {
        chain_id: destination_chain_id,
    })?;
    let root = tree.root();

    let transfer_ids: Vec<Binary> = pending
        .transfer_ids
        .iter()
        .map(|id| Binary::from(id.to_vec()))
        .collect();

    COMMITMENTS.save(
        deps.storage,
        &root,
        &Commitment {
            destination_chain_id,
            total_amount: pending.amount,
            transfer_ids,
            committed_at: env.block.time,
        },
    )?;

    let mut stats = STATS.load(deps.storage)?;
    stats.roots_committed += 1;
    STATS.save(deps.storage, &stats)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    if let Some(messenger) = config.messenger.as_ref() {
        let payload = to_json_binary(&CrossDomainMessage::SetTransferRoot {
            root: Binary::from(root.to_vec()),
            total_amount: pending.amount,
        })?;
        messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: messenger.to_string(),
            msg: to_json_binary(&MessengerExecuteMsg::SendMessage {
                destination_chain_id,
                payload,
            })?,
            funds: vec![],
        }));
    }

    let ids_hex: Vec<String> = pending.transfer_ids.iter().map(bytes32_to_hex).collect();
    let event = Event::new("transfers_committed")
        .add_attribute("root", bytes32_to_hex(&root))
        .add_attribute("destination_chain_ids", destination_chain_id.to_string())
        .add_attribute("amounts", pending.amount.to_string())
        .add_attribute("transfer_count", ids_hex.len().to_string())
        .add_attribute("transfer_ids", ids_hex.join(","));

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", "commit_transfers")
        .add_attribute("committer", info.sender)
        .set_data(Binary::from(root.to_vec())))
}
