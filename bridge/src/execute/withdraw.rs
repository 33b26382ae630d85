//! Direct withdrawal of a transfer that no bonder fronted.

use cosmwasm_std::{Binary, DepsMut, Env, Event, MessageInfo, Response, Uint128};

use common::{bytes32_to_hex, verify_proof, MerkleProof};

use crate::error::ContractError;
use crate::execute::{ensure_unrecorded, incoming_transfer, parse_hash, pay_transfer};
use crate::registry;
use crate::state::{WithdrawalRecord, WithdrawalStatus, CONFIG, STATS, WITHDRAWALS};

/// Withdraw a transfer against its registered root
///
/// The caller earns the relayer fee.
#[allow(clippy::too_many_arguments)]
pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
    transfer_nonce: u64,
    relayer_fee: Uint128,
    amount_out_min: Uint128,
    deadline: u64,
    root: Binary,
    proof: MerkleProof,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let root = parse_hash(&root)?;

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

    registry::load(deps.storage, &root)?;
    if !verify_proof(&root, &transfer_id, &proof) {
        return Err(ContractError::InvalidProof);
    }
    registry::record_withdrawal(deps.storage, &root, amount)?;

    WITHDRAWALS.save(
        deps.storage,
        &transfer_id,
        &WithdrawalRecord {
            status: WithdrawalStatus::Withdrawn,
            bonder: None,
            recipient: recipient_addr.clone(),
            amount,
            relayer_fee,
            bonded_at: None,
            settled_root: Some(Binary::from(root.to_vec())),
            settled_at: Some(env.block.time),
        },
    )?;

    let mut stats = STATS.load(deps.storage)?;
    stats.withdrawals_unbonded += 1;
    STATS.save(deps.storage, &stats)?;

    let (messages, payout) = pay_transfer(
        deps.as_ref(),
        &env,
        &config,
        &transfer,
        &recipient_addr,
        &info.sender,
    )?;

    let event = Event::new("withdrew")
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("root", bytes32_to_hex(&root))
        .add_attribute("recipient", recipient_addr.as_str())
        .add_attribute("amount", amount.to_string())
        .add_attribute("relayer_fee", relayer_fee.to_string())
        .add_attribute("relayer", info.sender.as_str())
        .add_attribute("swap", payout.as_str());

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", "withdraw")
        .set_data(Binary::from(transfer_id.to_vec())))
}
