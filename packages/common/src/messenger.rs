//! Cross-domain channel interface.
//!
//! The source bridge hands committed roots to a messenger contract, which
//! delivers the payload to the destination chain asynchronously. Delivery may
//! be duplicated or reordered; the destination rejects roots it has already
//! registered.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

#[cw_serde]
pub enum MessengerExecuteMsg {
    /// Queue `payload` for delivery to the bridge on `destination_chain_id`
    SendMessage {
        destination_chain_id: u64,
        payload: Binary,
    },
}

/// Payloads carried from a source bridge to a destination bridge
#[cw_serde]
pub enum CrossDomainMessage {
    /// A committed transfer root and the value it authorizes
    SetTransferRoot { root: Binary, total_amount: Uint128 },
}
