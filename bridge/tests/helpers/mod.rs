//! Shared cw-multi-test setup: bridge contracts plus mock exchange and messenger.
#![allow(dead_code)]

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, Binary, Deps, DepsMut, Empty, Env, MessageInfo,
    Response, StdError, StdResult, Uint128,
};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};
use cw_storage_plus::Item;

use bridge::msg::{ExecuteMsg, InstantiateMsg, PendingTransfersResponse, QueryMsg};
use common::exchange::{ExchangeExecuteMsg, ExchangeQueryMsg, SimulationResponse};
use common::messenger::MessengerExecuteMsg;
use common::Transfer;

pub const BRIDGE_DENOM: &str = "uhtoken";
pub const CANONICAL_DENOM: &str = "uusdc";

pub const SOURCE_CHAIN_ID: u64 = 10;
pub const DESTINATION_CHAIN_ID: u64 = 42161;

pub const INITIAL_BALANCE: u128 = 10_000_000_000;

// ============================================================================
// Mock Exchange (fixed 99% rate between any two denoms)
// ============================================================================

pub fn exchange_return(offer_amount: Uint128) -> Uint128 {
    offer_amount.multiply_ratio(99u128, 100u128)
}

fn exchange_instantiate(
    _deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: Empty,
) -> StdResult<Response> {
    Ok(Response::new())
}

fn exchange_execute(
    _deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExchangeExecuteMsg,
) -> StdResult<Response> {
    match msg {
        ExchangeExecuteMsg::Swap {
            ask_denom,
            min_return,
            recipient,
        } => {
            let offer = info
                .funds
                .first()
                .ok_or_else(|| StdError::generic_err("no offer attached"))?;
            let return_amount = exchange_return(offer.amount);
            if return_amount < min_return {
                return Err(StdError::generic_err("exchange: min_return not met"));
            }
            let to_address = recipient.unwrap_or_else(|| info.sender.to_string());
            Ok(Response::new().add_message(BankMsg::Send {
                to_address,
                amount: coins(return_amount.u128(), ask_denom),
            }))
        }
    }
}

fn exchange_query(_deps: Deps, _env: Env, msg: ExchangeQueryMsg) -> StdResult<Binary> {
    match msg {
        ExchangeQueryMsg::Simulate { offer_amount, .. } => to_json_binary(&SimulationResponse {
            return_amount: exchange_return(offer_amount),
        }),
    }
}

// ============================================================================
// Mock Messenger (records every message it is asked to send)
// ============================================================================

#[cw_serde]
pub struct SentMessage {
    pub destination_chain_id: u64,
    pub payload: Binary,
}

#[cw_serde]
pub enum MessengerQueryMsg {
    Sent {},
}

const SENT: Item<Vec<SentMessage>> = Item::new("sent");

fn messenger_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: Empty,
) -> StdResult<Response> {
    SENT.save(deps.storage, &vec![])?;
    Ok(Response::new())
}

fn messenger_execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: MessengerExecuteMsg,
) -> StdResult<Response> {
    match msg {
        MessengerExecuteMsg::SendMessage {
            destination_chain_id,
            payload,
        } => {
            SENT.update(deps.storage, |mut sent| -> StdResult<_> {
                sent.push(SentMessage {
                    destination_chain_id,
                    payload,
                });
                Ok(sent)
            })?;
            Ok(Response::new())
        }
    }
}

fn messenger_query(deps: Deps, _env: Env, msg: MessengerQueryMsg) -> StdResult<Binary> {
    match msg {
        MessengerQueryMsg::Sent {} => to_json_binary(&SENT.load(deps.storage)?),
    }
}

// ============================================================================
// Test Setup
// ============================================================================

fn contract_bridge() -> Box<dyn cw_multi_test::Contract<Empty>> {
    let contract = ContractWrapper::new(
        bridge::contract::execute,
        bridge::contract::instantiate,
        bridge::contract::query,
    );
    Box::new(contract)
}

fn contract_exchange() -> Box<dyn cw_multi_test::Contract<Empty>> {
    Box::new(ContractWrapper::new(
        exchange_execute,
        exchange_instantiate,
        exchange_query,
    ))
}

fn contract_messenger() -> Box<dyn cw_multi_test::Contract<Empty>> {
    Box::new(ContractWrapper::new(
        messenger_execute,
        messenger_instantiate,
        messenger_query,
    ))
}

pub struct TestEnv {
    pub app: App,
    /// Bridge on SOURCE_CHAIN_ID
    pub source: Addr,
    /// Bridge on DESTINATION_CHAIN_ID
    pub destination: Addr,
    pub exchange: Addr,
    pub messenger: Addr,
    pub governance: Addr,
    pub bonder: Addr,
    pub relayer: Addr,
    pub user: Addr,
    pub recipient: Addr,
}

pub fn setup() -> TestEnv {
    setup_with_max_pending(None)
}

/// Two bridges in one app: SOURCE_CHAIN_ID -> DESTINATION_CHAIN_ID
pub fn setup_with_max_pending(max_pending_transfers: Option<u32>) -> TestEnv {
    let mut app = App::default();

    let governance = Addr::unchecked("terra1governance");
    let bonder = Addr::unchecked("terra1bonder");
    let relayer = Addr::unchecked("terra1relayer");
    let user = Addr::unchecked("terra1user");
    let recipient = Addr::unchecked("terra1recipient");
    let treasury = Addr::unchecked("terra1treasury");

    app.init_modules(|router, _, storage| {
        for account in [&governance, &bonder, &relayer, &user, &treasury] {
            router
                .bank
                .init_balance(
                    storage,
                    account,
                    vec![
                        cosmwasm_std::coin(INITIAL_BALANCE, BRIDGE_DENOM),
                        cosmwasm_std::coin(INITIAL_BALANCE, CANONICAL_DENOM),
                    ],
                )
                .unwrap();
        }
    });

    let exchange_code = app.store_code(contract_exchange());
    let exchange = app
        .instantiate_contract(
            exchange_code,
            governance.clone(),
            &Empty {},
            &[],
            "exchange",
            None,
        )
        .unwrap();
    app.send_tokens(
        treasury.clone(),
        exchange.clone(),
        &[
            cosmwasm_std::coin(1_000_000_000, BRIDGE_DENOM),
            cosmwasm_std::coin(1_000_000_000, CANONICAL_DENOM),
        ],
    )
    .unwrap();

    let messenger_code = app.store_code(contract_messenger());
    let messenger = app
        .instantiate_contract(
            messenger_code,
            governance.clone(),
            &Empty {},
            &[],
            "messenger",
            None,
        )
        .unwrap();

    let bridge_code = app.store_code(contract_bridge());
    let source = app
        .instantiate_contract(
            bridge_code,
            governance.clone(),
            &InstantiateMsg {
                governance: governance.to_string(),
                chain_id: SOURCE_CHAIN_ID,
                bridge_denom: BRIDGE_DENOM.to_string(),
                canonical_denom: CANONICAL_DENOM.to_string(),
                exchange: Some(exchange.to_string()),
                messenger: Some(messenger.to_string()),
                root_relayer: relayer.to_string(),
                max_pending_transfers,
                supported_chain_ids: vec![DESTINATION_CHAIN_ID],
                bonders: vec![bonder.to_string()],
            },
            &[],
            "bridge-source",
            Some(governance.to_string()),
        )
        .unwrap();

    let destination = app
        .instantiate_contract(
            bridge_code,
            governance.clone(),
            &InstantiateMsg {
                governance: governance.to_string(),
                chain_id: DESTINATION_CHAIN_ID,
                bridge_denom: BRIDGE_DENOM.to_string(),
                canonical_denom: CANONICAL_DENOM.to_string(),
                exchange: Some(exchange.to_string()),
                messenger: Some(messenger.to_string()),
                root_relayer: relayer.to_string(),
                max_pending_transfers,
                supported_chain_ids: vec![SOURCE_CHAIN_ID],
                bonders: vec![bonder.to_string()],
            },
            &[],
            "bridge-destination",
            Some(governance.to_string()),
        )
        .unwrap();

    TestEnv {
        app,
        source,
        destination,
        exchange,
        messenger,
        governance,
        bonder,
        relayer,
        user,
        recipient,
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// A transfer to `recipient` on DESTINATION_CHAIN_ID with no destination swap
pub fn transfer(recipient: &Addr, amount: u128, nonce: u64, relayer_fee: u128) -> Transfer {
    Transfer {
        chain_id: DESTINATION_CHAIN_ID,
        recipient: recipient.to_string(),
        amount: Uint128::new(amount),
        transfer_nonce: nonce,
        relayer_fee: Uint128::new(relayer_fee),
        amount_out_min: Uint128::zero(),
        deadline: 0,
    }
}

pub fn id_binary(transfer: &Transfer) -> Binary {
    Binary::from(transfer.transfer_id().to_vec())
}

impl TestEnv {
    pub fn send(&mut self, transfer: &Transfer) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.user.clone(),
            self.source.clone(),
            &ExecuteMsg::Send {
                chain_id: transfer.chain_id,
                recipient: transfer.recipient.clone(),
                amount: transfer.amount,
                transfer_nonce: transfer.transfer_nonce,
                relayer_fee: transfer.relayer_fee,
                amount_out_min: transfer.amount_out_min,
                deadline: transfer.deadline,
            },
            &coins(transfer.amount.u128(), BRIDGE_DENOM),
        )
    }

    pub fn commit(&mut self) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.bonder.clone(),
            self.source.clone(),
            &ExecuteMsg::CommitTransfers {
                destination_chain_id: DESTINATION_CHAIN_ID,
            },
            &[],
        )
    }

    /// Relay a root to the destination bridge with its funds attached
    pub fn set_root(&mut self, root: &Binary, total_amount: u128) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.relayer.clone(),
            self.destination.clone(),
            &ExecuteMsg::SetTransferRoot {
                root: root.clone(),
                total_amount: Uint128::new(total_amount),
            },
            &coins(total_amount, BRIDGE_DENOM),
        )
    }

    pub fn stake(&mut self, amount: u128) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.bonder.clone(),
            self.destination.clone(),
            &ExecuteMsg::Stake {},
            &coins(amount, BRIDGE_DENOM),
        )
    }

    pub fn bond(&mut self, transfer: &Transfer) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.bonder.clone(),
            self.destination.clone(),
            &ExecuteMsg::BondWithdrawal {
                recipient: transfer.recipient.clone(),
                amount: transfer.amount,
                transfer_nonce: transfer.transfer_nonce,
                relayer_fee: transfer.relayer_fee,
                amount_out_min: transfer.amount_out_min,
                deadline: transfer.deadline,
            },
            &[],
        )
    }

    pub fn pending(&self) -> PendingTransfersResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.source,
                &QueryMsg::PendingTransfers {
                    chain_id: DESTINATION_CHAIN_ID,
                },
            )
            .unwrap()
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.app
            .wrap()
            .query_wasm_smart(&self.messenger, &MessengerQueryMsg::Sent {})
            .unwrap()
    }

    pub fn balance(&self, address: &Addr, denom: &str) -> u128 {
        self.app
            .wrap()
            .query_balance(address, denom)
            .unwrap()
            .amount
            .u128()
    }
}

/// First custom event of type `ty` emitted by the bridge
pub fn event_attr(res: &AppResponse, ty: &str, key: &str) -> Option<String> {
    let ty = format!("wasm-{}", ty);
    res.events
        .iter()
        .filter(|e| e.ty == ty)
        .flat_map(|e| e.attributes.iter())
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}
