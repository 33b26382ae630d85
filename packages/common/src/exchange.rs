//! Message interface of the swap collaborator.
//!
//! The bridge treats the exchange as a black box with a quote (`Simulate`)
//! and an execute (`Swap`) operation. Offer funds are attached to `Swap`.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

#[cw_serde]
pub enum ExchangeExecuteMsg {
    /// Swap the attached funds into `ask_denom`
    ///
    /// Fails if the output would be below `min_return`. The output goes to
    /// `recipient`, or back to the sender when unset. Within one transaction
    /// the output equals what `Simulate` quoted for the same offer.
    Swap {
        ask_denom: String,
        min_return: Uint128,
        recipient: Option<String>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum ExchangeQueryMsg {
    /// Quote the output of swapping `offer_amount` of `offer_denom`
    #[returns(SimulationResponse)]
    Simulate {
        offer_denom: String,
        offer_amount: Uint128,
        ask_denom: String,
    },
}

#[cw_serde]
pub struct SimulationResponse {
    pub return_amount: Uint128,
}
