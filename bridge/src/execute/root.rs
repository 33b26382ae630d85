//! Root arrival from the cross-domain channel.

use cosmwasm_std::{Binary, DepsMut, Env, Event, MessageInfo, Response, Uint128};

use common::bytes32_to_hex;

use crate::error::ContractError;
use crate::execute::{must_pay_exact, parse_hash};
use crate::registry;
use crate::state::{CONFIG, STATS};

/// Register a transfer root committed on another chain
///
/// The bridge tokens backing the root arrive with the message and are held by
/// this contract until withdrawals and settlements draw them down.
pub fn execute_set_transfer_root(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    root: Binary,
    total_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if info.sender != config.root_relayer {
        return Err(ContractError::UnauthorizedRelayer);
    }

    let root = parse_hash(&root)?;
    must_pay_exact(&info, &config.bridge_denom, total_amount)?;

    registry::register(deps.storage, &root, total_amount, env.block.time)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.roots_received += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_event(
            Event::new("transfer_root_set")
                .add_attribute("root", bytes32_to_hex(&root))
                .add_attribute("total_amount", total_amount.to_string()),
        )
        .add_attribute("method", "set_transfer_root"))
}
