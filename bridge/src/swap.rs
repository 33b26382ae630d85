//! Calls into the swap collaborator.
//!
//! Source side swaps are strict: an expired deadline or a quote below the
//! minimum rejects the send. Destination side swaps are attempted: when the
//! swap cannot be performed the recipient is paid in the bridge token.

use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Coin, CosmosMsg, Deps, Env, Uint128, WasmMsg,
};

use common::exchange::{ExchangeExecuteMsg, ExchangeQueryMsg, SimulationResponse};

use crate::error::ContractError;
use crate::state::Config;

/// Ask the exchange how much `ask_denom` an offer would return
pub fn quote(
    deps: Deps,
    exchange: &Addr,
    offer_denom: &str,
    offer_amount: Uint128,
    ask_denom: &str,
) -> Result<Uint128, ContractError> {
    let response: SimulationResponse = deps.querier.query_wasm_smart(
        exchange,
        &ExchangeQueryMsg::Simulate {
            offer_denom: offer_denom.to_string(),
            offer_amount,
            ask_denom: ask_denom.to_string(),
        },
    )?;
    Ok(response.return_amount)
}

/// Build the exchange call for a swap whose output has already been quoted
pub fn swap_msg(
    exchange: &Addr,
    offer: Coin,
    ask_denom: &str,
    min_return: Uint128,
    recipient: Option<String>,
) -> Result<CosmosMsg, ContractError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: exchange.to_string(),
        msg: to_json_binary(&ExchangeExecuteMsg::Swap {
            ask_denom: ask_denom.to_string(),
            min_return,
            recipient,
        })?,
        funds: vec![offer],
    }))
}

/// Source-side swap of canonical tokens into bridge tokens held by this contract
///
/// Returns the quoted output (the amount that will be transferred) and the
/// message performing the swap. The quote and the swap run in the same
/// transaction against the same pool state, so the exchange delivers exactly
/// the quote and the caller burns all of it. `min_return` is the quote so a
/// short delivery reverts the send.
pub fn swap_canonical_for_bridge(
    deps: Deps,
    env: &Env,
    config: &Config,
    amount: Uint128,
    amount_out_min: Uint128,
    deadline: u64,
) -> Result<(Uint128, CosmosMsg), ContractError> {
    let exchange = config
        .exchange
        .as_ref()
        .ok_or(ContractError::ExchangeNotConfigured)?;

    let now = env.block.time.seconds();
    if now > deadline {
        return Err(ContractError::Expired { deadline, now });
    }

    let amount_out = quote(
        deps,
        exchange,
        &config.canonical_denom,
        amount,
        &config.bridge_denom,
    )?;
    if amount_out < amount_out_min {
        return Err(ContractError::SlippageExceeded {
            amount_out_min,
            amount_out,
        });
    }

    let msg = swap_msg(
        exchange,
        Coin {
            denom: config.canonical_denom.clone(),
            amount,
        },
        &config.bridge_denom,
        amount_out,
        Some(env.contract.address.to_string()),
    )?;
    Ok((amount_out, msg))
}

/// How a destination payout was delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Payout {
    Swapped,
    Direct,
}

impl Payout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Payout::Swapped => "executed",
            Payout::Direct => "skipped",
        }
    }
}

/// Pay `amount` bridge tokens to `recipient`, converting to the canonical
/// asset when the transfer asked for a destination swap and it can be done
pub fn payout_with_attempted_swap(
    deps: Deps,
    env: &Env,
    config: &Config,
    recipient: &Addr,
    amount: Uint128,
    amount_out_min: Uint128,
    deadline: u64,
) -> Result<(Vec<CosmosMsg>, Payout), ContractError> {
    if amount.is_zero() {
        return Ok((vec![], Payout::Direct));
    }

    if deadline > 0 {
        if let Some(exchange) = config.exchange.as_ref() {
            if let Some(min_return) =
                attempt_quote(deps, env, config, exchange, amount, amount_out_min, deadline)
            {
                let msg = swap_msg(
                    exchange,
                    Coin {
                        denom: config.bridge_denom.clone(),
                        amount,
                    },
                    &config.canonical_denom,
                    min_return,
                    Some(recipient.to_string()),
                )?;
                return Ok((vec![msg], Payout::Swapped));
            }
        }
    }

    let msg = CosmosMsg::Bank(BankMsg::Send {
        to_address: recipient.to_string(),
        amount: vec![Coin {
            denom: config.bridge_denom.clone(),
            amount,
        }],
    });
    Ok((vec![msg], Payout::Direct))
}

fn attempt_quote(
    deps: Deps,
    env: &Env,
    config: &Config,
    exchange: &Addr,
    amount: Uint128,
    amount_out_min: Uint128,
    deadline: u64,
) -> Option<Uint128> {
    let now = env.block.time.seconds();
    if now > deadline {
        deps.api
            .debug(&format!("destination swap skipped: deadline {deadline} passed at {now}"));
        return None;
    }

    match quote(
        deps,
        exchange,
        &config.bridge_denom,
        amount,
        &config.canonical_denom,
    ) {
        Ok(amount_out) if amount_out >= amount_out_min && !amount_out.is_zero() => Some(amount_out),
        Ok(amount_out) => {
            deps.api.debug(&format!(
                "destination swap skipped: quote {amount_out} below minimum {amount_out_min}"
            ));
            None
        }
        Err(err) => {
            deps.api
                .debug(&format!("destination swap skipped: quote failed: {err}"));
            None
        }
    }
}
