//! Execute handlers for the bonded bridge contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `send` - Send and SwapAndSend (source side)
//! - `commit` - CommitTransfers (source side)
//! - `root` - SetTransferRoot (destination side)
//! - `bond` - BondWithdrawal and settlement (destination side)
//! - `withdraw` - Withdraw without a bond (destination side)
//! - `stake` - Bonder collateral
//! - `governance` - Supported chains, bonders and collaborator addresses

mod bond;
mod commit;
mod governance;
mod root;
mod send;
mod stake;
mod withdraw;

pub use bond::*;
pub use commit::*;
pub use governance::*;
pub use root::*;
pub use send::*;
pub use stake::*;
pub use withdraw::*;

use cosmwasm_std::{Binary, MessageInfo, Uint128};

use common::Bytes32;

use crate::error::ContractError;

/// Parse a 32-byte hash from message input
pub(crate) fn parse_hash(hash: &Binary) -> Result<Bytes32, ContractError> {
    hash.as_slice()
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: hash.len() })
}

/// Require exactly one coin of `denom` attached, returning its amount
pub(crate) fn must_pay(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    match info.funds.as_slice() {
        [] => Err(ContractError::InvalidFunds {
            reason: format!("No {} sent", denom),
        }),
        [coin] if coin.denom == denom && !coin.amount.is_zero() => Ok(coin.amount),
        [coin] => Err(ContractError::InvalidFunds {
            reason: format!("Expected {}, got {}", denom, coin.denom),
        }),
        _ => Err(ContractError::InvalidFunds {
            reason: "Only one token type allowed per transaction".to_string(),
        }),
    }
}

/// Require exactly `amount` of `denom` attached
pub(crate) fn must_pay_exact(
    info: &MessageInfo,
    denom: &str,
    amount: Uint128,
) -> Result<(), ContractError> {
    let paid = must_pay(info, denom)?;
    if paid != amount {
        return Err(ContractError::InvalidFunds {
            reason: format!("Expected {} {}, got {}", amount, denom, paid),
        });
    }
    Ok(())
}
