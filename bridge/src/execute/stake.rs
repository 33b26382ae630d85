//! Bonder collateral.

use cosmwasm_std::{BankMsg, Coin, DepsMut, Event, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::execute::must_pay;
use crate::state::{BONDERS, CONFIG};

/// Post the attached bridge tokens as collateral
pub fn execute_stake(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut account = BONDERS
        .may_load(deps.storage, &info.sender)?
        .ok_or(ContractError::UnauthorizedBonder)?;

    let amount = must_pay(&info, &config.bridge_denom)?;
    account.credit += amount;
    BONDERS.save(deps.storage, &info.sender, &account)?;

    Ok(Response::new()
        .add_event(
            Event::new("stake")
                .add_attribute("bonder", info.sender.as_str())
                .add_attribute("amount", amount.to_string())
                .add_attribute("credit", account.credit.to_string()),
        )
        .add_attribute("method", "stake"))
}

/// Return collateral that is not backing outstanding bonds
pub fn execute_unstake(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut account = BONDERS
        .may_load(deps.storage, &info.sender)?
        .ok_or(ContractError::UnauthorizedBonder)?;

    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Unstake amount must be greater than zero".to_string(),
        });
    }

    let available = account.available();
    if amount > available {
        return Err(ContractError::InsufficientBond {
            required: amount,
            available,
        });
    }

    account.credit -= amount;
    BONDERS.save(deps.storage, &info.sender, &account)?;

    let msg = BankMsg::Send {
        to_address: info.sender.to_string(),
        amount: vec![Coin {
            denom: config.bridge_denom,
            amount,
        }],
    };

    Ok(Response::new()
        .add_message(msg)
        .add_event(
            Event::new("unstake")
                .add_attribute("bonder", info.sender.as_str())
                .add_attribute("amount", amount.to_string())
                .add_attribute("credit", account.credit.to_string()),
        )
        .add_attribute("method", "unstake"))
}
