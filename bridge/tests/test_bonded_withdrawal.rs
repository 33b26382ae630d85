//! Destination-side tests: bonding, settlement, direct withdrawals and collateral.

mod helpers;

use cosmwasm_std::{Binary, Uint128};
use cw_multi_test::Executor;

use bridge::msg::{
    BondedWithdrawalsResponse, BonderResponse, ExecuteMsg, QueryMsg, StatsResponse,
    TransferRootResponse, WithdrawalResponse,
};
use bridge::state::WithdrawalStatus;
use common::{MerkleProof, MerkleTree, Transfer};

use helpers::{
    event_attr, exchange_return, id_binary, setup, transfer, TestEnv, BRIDGE_DENOM,
    CANONICAL_DENOM, INITIAL_BALANCE,
};

// ============================================================================
// Helpers
// ============================================================================

fn tree(transfers: &[&Transfer]) -> MerkleTree {
    let ids: Vec<_> = transfers.iter().map(|t| t.transfer_id()).collect();
    MerkleTree::new(&ids).unwrap()
}

fn root_binary(tree: &MerkleTree) -> Binary {
    Binary::from(tree.root().to_vec())
}

fn settle(
    env: &mut TestEnv,
    t: &Transfer,
    root: &Binary,
    proof: MerkleProof,
) -> anyhow::Result<cw_multi_test::AppResponse> {
    env.app.execute_contract(
        env.user.clone(),
        env.destination.clone(),
        &ExecuteMsg::SettleBondedWithdrawal {
            transfer_id: id_binary(t),
            root: root.clone(),
            proof,
        },
        &[],
    )
}

fn withdraw(
    env: &mut TestEnv,
    t: &Transfer,
    root: &Binary,
    proof: MerkleProof,
) -> anyhow::Result<cw_multi_test::AppResponse> {
    env.app.execute_contract(
        env.user.clone(),
        env.destination.clone(),
        &ExecuteMsg::Withdraw {
            recipient: t.recipient.clone(),
            amount: t.amount,
            transfer_nonce: t.transfer_nonce,
            relayer_fee: t.relayer_fee,
            amount_out_min: t.amount_out_min,
            deadline: t.deadline,
            root: root.clone(),
            proof,
        },
        &[],
    )
}

fn withdrawal(env: &TestEnv, t: &Transfer) -> WithdrawalResponse {
    env.app
        .wrap()
        .query_wasm_smart(
            &env.destination,
            &QueryMsg::Withdrawal {
                transfer_id: id_binary(t),
            },
        )
        .unwrap()
}

fn bonder_account(env: &TestEnv) -> BonderResponse {
    env.app
        .wrap()
        .query_wasm_smart(
            &env.destination,
            &QueryMsg::Bonder {
                address: env.bonder.to_string(),
            },
        )
        .unwrap()
}

// ============================================================================
// Bonding
// ============================================================================

#[test]
fn test_bond_pays_recipient_and_bonder() {
    let mut env = setup();
    let t = transfer(&env.recipient, 100, 1, 1);

    env.stake(1000).unwrap();
    let res = env.bond(&t).unwrap();

    assert_eq!(event_attr(&res, "transfer_bonded", "bonder").unwrap(), env.bonder.to_string());
    assert_eq!(event_attr(&res, "transfer_bonded", "amount").unwrap(), "100");
    assert_eq!(event_attr(&res, "transfer_bonded", "swap").unwrap(), "skipped");

    assert_eq!(env.balance(&env.recipient, BRIDGE_DENOM), 99);
    // Stake out, relayer fee back in
    assert_eq!(env.balance(&env.bonder, BRIDGE_DENOM), INITIAL_BALANCE - 1000 + 1);
    assert_eq!(env.balance(&env.destination, BRIDGE_DENOM), 900);

    let account = bonder_account(&env);
    assert!(account.is_bonder);
    assert_eq!(account.credit, Uint128::new(1000));
    assert_eq!(account.debit, Uint128::new(100));
    assert_eq!(account.available, Uint128::new(900));

    let record = withdrawal(&env, &t);
    assert_eq!(record.status, Some(WithdrawalStatus::Bonded));
    assert_eq!(record.bonder, Some(env.bonder.clone()));
    assert_eq!(record.amount, Uint128::new(100));
    assert_eq!(record.bonded_at, Some(env.app.block_info().time));
}

#[test]
fn test_double_bond_rejected() {
    let mut env = setup();
    let t = transfer(&env.recipient, 100, 1, 1);

    env.stake(1000).unwrap();
    env.bond(&t).unwrap();

    let res = env.bond(&t);
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Transfer already bonded"), "{}", err_str);

    assert_eq!(bonder_account(&env).debit, Uint128::new(100));
    assert_eq!(env.balance(&env.recipient, BRIDGE_DENOM), 99);
}

#[test]
fn test_bond_requires_bonder() {
    let mut env = setup();
    let t = transfer(&env.recipient, 100, 1, 1);

    let res = env.app.execute_contract(
        env.user.clone(),
        env.destination.clone(),
        &ExecuteMsg::BondWithdrawal {
            recipient: t.recipient.clone(),
            amount: t.amount,
            transfer_nonce: t.transfer_nonce,
            relayer_fee: t.relayer_fee,
            amount_out_min: t.amount_out_min,
            deadline: t.deadline,
        },
        &[],
    );
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("caller is not a bonder"), "{}", err_str);
}

#[test]
fn test_bond_beyond_collateral_rejected() {
    let mut env = setup();

    env.stake(150).unwrap();
    env.bond(&transfer(&env.recipient.clone(), 100, 1, 1)).unwrap();

    let res = env.bond(&transfer(&env.recipient.clone(), 100, 2, 1));
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Insufficient bond"), "{}", err_str);
    assert_eq!(bonder_account(&env).debit, Uint128::new(100));
}

#[test]
fn test_bonded_withdrawals_query_reports_age() {
    let mut env = setup();
    let recipient = env.recipient.clone();

    env.stake(1000).unwrap();
    env.bond(&transfer(&recipient, 100, 1, 1)).unwrap();
    env.bond(&transfer(&recipient, 200, 2, 1)).unwrap();

    env.app.update_block(|block| {
        block.time = block.time.plus_seconds(100);
        block.height += 10;
    });

    let res: BondedWithdrawalsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.destination,
            &QueryMsg::BondedWithdrawals {
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
    assert_eq!(res.withdrawals.len(), 2);
    assert!(res.withdrawals.iter().all(|w| w.age_seconds == 100));
    assert!(res.withdrawals.iter().all(|w| w.bonder == env.bonder));

    let page: BondedWithdrawalsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.destination,
            &QueryMsg::BondedWithdrawals {
                start_after: Some(res.withdrawals[0].transfer_id.clone()),
                limit: Some(10),
            },
        )
        .unwrap();
    assert_eq!(page.withdrawals.len(), 1);
    assert_eq!(page.withdrawals[0].transfer_id, res.withdrawals[1].transfer_id);
}

#[test]
fn test_bonded_withdrawals_query_skips_settled_bonds() {
    let mut env = setup();
    let recipient = env.recipient.clone();
    let transfers: Vec<_> = (1..=5).map(|n| transfer(&recipient, 100, n, 1)).collect();
    let refs: Vec<_> = transfers.iter().collect();
    let tree = tree(&refs);
    let root = root_binary(&tree);

    env.stake(1000).unwrap();
    for t in &transfers {
        env.bond(t).unwrap();
    }
    env.set_root(&root, 500).unwrap();

    // Settle every bond but the one whose id sorts last
    let mut ids: Vec<_> = transfers.iter().map(|t| t.transfer_id()).collect();
    ids.sort();
    let outstanding = Binary::from(ids[ids.len() - 1].to_vec());
    for (index, t) in transfers.iter().enumerate() {
        if id_binary(t) != outstanding {
            settle(&mut env, t, &root, tree.proof(index).unwrap()).unwrap();
        }
    }

    let page: BondedWithdrawalsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.destination,
            &QueryMsg::BondedWithdrawals {
                start_after: None,
                limit: Some(1),
            },
        )
        .unwrap();
    assert_eq!(page.withdrawals.len(), 1);
    assert_eq!(page.withdrawals[0].transfer_id, outstanding);
    assert_eq!(page.withdrawals[0].amount, Uint128::new(100));

    let next: BondedWithdrawalsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.destination,
            &QueryMsg::BondedWithdrawals {
                start_after: Some(outstanding),
                limit: Some(1),
            },
        )
        .unwrap();
    assert!(next.withdrawals.is_empty());
}

// ============================================================================
// Destination Swap
// ============================================================================

#[test]
fn test_bond_with_destination_swap() {
    let mut env = setup();
    let mut t = transfer(&env.recipient, 100, 1, 1);
    t.amount_out_min = Uint128::new(90);
    t.deadline = env.app.block_info().time.seconds() + 600;

    env.stake(1000).unwrap();
    let res = env.bond(&t).unwrap();

    assert_eq!(event_attr(&res, "transfer_bonded", "swap").unwrap(), "executed");
    assert_eq!(
        env.balance(&env.recipient, CANONICAL_DENOM),
        exchange_return(Uint128::new(99)).u128()
    );
    assert_eq!(env.balance(&env.recipient, BRIDGE_DENOM), 0);
}

#[test]
fn test_destination_swap_falls_back_to_bridge_token() {
    let mut env = setup();
    let now = env.app.block_info().time.seconds();
    env.stake(1000).unwrap();

    // Quote (98) below the minimum
    let mut t = transfer(&env.recipient, 100, 1, 1);
    t.amount_out_min = Uint128::new(99);
    t.deadline = now + 600;
    let res = env.bond(&t).unwrap();
    assert_eq!(event_attr(&res, "transfer_bonded", "swap").unwrap(), "skipped");
    assert_eq!(env.balance(&env.recipient, BRIDGE_DENOM), 99);

    // Deadline already passed
    let mut t = transfer(&env.recipient, 100, 2, 1);
    t.amount_out_min = Uint128::new(1);
    t.deadline = now - 1;
    let res = env.bond(&t).unwrap();
    assert_eq!(event_attr(&res, "transfer_bonded", "swap").unwrap(), "skipped");
    assert_eq!(env.balance(&env.recipient, BRIDGE_DENOM), 198);
    assert_eq!(env.balance(&env.recipient, CANONICAL_DENOM), 0);
}

// ============================================================================
// Settlement
// ============================================================================

#[test]
fn test_settle_bonded_withdrawal() {
    let mut env = setup();
    let t = transfer(&env.recipient, 100, 1, 1);
    let tree = tree(&[&t]);
    let root = root_binary(&tree);

    env.stake(1000).unwrap();
    env.bond(&t).unwrap();
    env.set_root(&root, 100).unwrap();

    let res = settle(&mut env, &t, &root, tree.proof(0).unwrap()).unwrap();
    assert_eq!(event_attr(&res, "transfer_settled", "amount").unwrap(), "100");
    assert_eq!(
        event_attr(&res, "transfer_settled", "bonder").unwrap(),
        env.bonder.to_string()
    );

    let record = withdrawal(&env, &t);
    assert_eq!(record.status, Some(WithdrawalStatus::Settled));
    assert_eq!(record.settled_root, Some(root.clone()));

    let account = bonder_account(&env);
    assert_eq!(account.debit, Uint128::zero());
    assert_eq!(account.available, Uint128::new(1000));

    let transfer_root: TransferRootResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.destination, &QueryMsg::TransferRoot { root: root.clone() })
        .unwrap();
    assert_eq!(transfer_root.amount_withdrawn, Uint128::new(100));

    // Collateral is fully backed again
    assert_eq!(env.balance(&env.destination, BRIDGE_DENOM), 1000);

    let res = settle(&mut env, &t, &root, tree.proof(0).unwrap());
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Transfer already settled"), "{}", err_str);
}

#[test]
fn test_settle_rejects_bad_inputs() {
    let mut env = setup();
    let t = transfer(&env.recipient, 100, 1, 1);
    let other = transfer(&env.recipient, 100, 2, 1);
    let tree = tree(&[&t]);
    let root = root_binary(&tree);

    // Never bonded
    env.set_root(&root, 100).unwrap();
    let res = settle(&mut env, &t, &root, tree.proof(0).unwrap());
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Transfer not bonded"), "{}", err_str);

    env.stake(1000).unwrap();
    env.bond(&t).unwrap();
    env.bond(&other).unwrap();

    // Root not registered
    let unknown = root_binary(&tree_of(&other));
    let res = settle(&mut env, &other, &unknown, tree_of(&other).proof(0).unwrap());
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Unknown transfer root"), "{}", err_str);

    // Proof of a transfer that is not in the root
    let res = settle(&mut env, &other, &root, tree_of(&other).proof(0).unwrap());
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Invalid Merkle proof"), "{}", err_str);

    assert_eq!(withdrawal(&env, &other).status, Some(WithdrawalStatus::Bonded));
    assert_eq!(bonder_account(&env).debit, Uint128::new(200));
}

fn tree_of(t: &Transfer) -> MerkleTree {
    tree(&[t])
}

#[test]
fn test_settle_cannot_overdraw_root() {
    let mut env = setup();
    let t = transfer(&env.recipient, 100, 1, 1);
    let tree = tree(&[&t]);
    let root = root_binary(&tree);

    env.stake(1000).unwrap();
    env.bond(&t).unwrap();
    // Root delivered with less value than the transfer it commits to
    env.set_root(&root, 50).unwrap();

    let res = settle(&mut env, &t, &root, tree.proof(0).unwrap());
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Transfer root overdrawn"), "{}", err_str);
    assert_eq!(withdrawal(&env, &t).status, Some(WithdrawalStatus::Bonded));
}

#[test]
fn test_settle_all_bonded_withdrawals_of_a_root() {
    let mut env = setup();
    let recipient = env.recipient.clone();
    let t1 = transfer(&recipient, 100, 1, 1);
    let t2 = transfer(&recipient, 200, 2, 1);
    let t3 = transfer(&recipient, 300, 3, 1);
    let tree = tree(&[&t1, &t2, &t3]);
    let root = root_binary(&tree);
    let ids = vec![id_binary(&t1), id_binary(&t2), id_binary(&t3)];

    env.stake(1000).unwrap();
    env.bond(&t1).unwrap();
    env.bond(&t2).unwrap();
    env.set_root(&root, 600).unwrap();

    // Wrong leaf order does not rebuild the root
    let res = env.app.execute_contract(
        env.user.clone(),
        env.destination.clone(),
        &ExecuteMsg::SettleBondedWithdrawals {
            root: root.clone(),
            transfer_ids: vec![ids[1].clone(), ids[0].clone(), ids[2].clone()],
        },
        &[],
    );
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Invalid Merkle proof"), "{}", err_str);

    let res = env
        .app
        .execute_contract(
            env.user.clone(),
            env.destination.clone(),
            &ExecuteMsg::SettleBondedWithdrawals {
                root: root.clone(),
                transfer_ids: ids.clone(),
            },
            &[],
        )
        .unwrap();
    let settled_events = res
        .events
        .iter()
        .filter(|e| e.ty == "wasm-transfer_settled")
        .count();
    assert_eq!(settled_events, 2);

    assert_eq!(withdrawal(&env, &t1).status, Some(WithdrawalStatus::Settled));
    assert_eq!(withdrawal(&env, &t2).status, Some(WithdrawalStatus::Settled));
    assert_eq!(withdrawal(&env, &t3).status, None);
    assert_eq!(bonder_account(&env).debit, Uint128::zero());

    // Nothing bonded is left under this root
    let res = env.app.execute_contract(
        env.user.clone(),
        env.destination.clone(),
        &ExecuteMsg::SettleBondedWithdrawals {
            root: root.clone(),
            transfer_ids: ids,
        },
        &[],
    );
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Nothing to settle"), "{}", err_str);

    // The unbonded transfer is still withdrawable from the remaining value
    withdraw(&mut env, &t3, &root, tree.proof(2).unwrap()).unwrap();
    assert_eq!(env.balance(&env.recipient, BRIDGE_DENOM), 99 + 199 + 299);

    let stats: StatsResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.destination, &QueryMsg::Stats {})
        .unwrap();
    assert_eq!(stats.withdrawals_bonded, 2);
    assert_eq!(stats.withdrawals_settled, 2);
    assert_eq!(stats.withdrawals_unbonded, 1);
}

// ============================================================================
// Direct Withdrawal
// ============================================================================

#[test]
fn test_withdraw_without_bond() {
    let mut env = setup();
    let t = transfer(&env.recipient, 100, 1, 3);
    let tree = tree(&[&t]);
    let root = root_binary(&tree);

    env.set_root(&root, 100).unwrap();
    let res = withdraw(&mut env, &t, &root, tree.proof(0).unwrap()).unwrap();
    assert_eq!(event_attr(&res, "withdrew", "relayer").unwrap(), env.user.to_string());

    assert_eq!(env.balance(&env.recipient, BRIDGE_DENOM), 97);
    // Caller collects the relayer fee
    assert_eq!(env.balance(&env.user, BRIDGE_DENOM), INITIAL_BALANCE + 3);
    assert_eq!(withdrawal(&env, &t).status, Some(WithdrawalStatus::Withdrawn));

    let res = withdraw(&mut env, &t, &root, tree.proof(0).unwrap());
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Transfer already withdrawn"), "{}", err_str);

    // A withdrawn transfer can no longer be bonded
    env.stake(1000).unwrap();
    let res = env.bond(&t);
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Transfer already withdrawn"), "{}", err_str);
}

#[test]
fn test_withdraw_bonded_transfer_rejected() {
    let mut env = setup();
    let t = transfer(&env.recipient, 100, 1, 1);
    let tree = tree(&[&t]);
    let root = root_binary(&tree);

    env.stake(1000).unwrap();
    env.bond(&t).unwrap();
    env.set_root(&root, 100).unwrap();

    let res = withdraw(&mut env, &t, &root, tree.proof(0).unwrap());
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Transfer already bonded"), "{}", err_str);

    let transfer_root: TransferRootResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.destination, &QueryMsg::TransferRoot { root })
        .unwrap();
    assert_eq!(transfer_root.amount_withdrawn, Uint128::zero());
}

// ============================================================================
// Collateral
// ============================================================================

#[test]
fn test_unstake_limited_to_available() {
    let mut env = setup();

    env.stake(1000).unwrap();
    env.bond(&transfer(&env.recipient.clone(), 100, 1, 1)).unwrap();

    let res = env.app.execute_contract(
        env.bonder.clone(),
        env.destination.clone(),
        &ExecuteMsg::Unstake {
            amount: Uint128::new(901),
        },
        &[],
    );
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("Insufficient bond"), "{}", err_str);

    let res = env
        .app
        .execute_contract(
            env.bonder.clone(),
            env.destination.clone(),
            &ExecuteMsg::Unstake {
                amount: Uint128::new(900),
            },
            &[],
        )
        .unwrap();
    assert_eq!(event_attr(&res, "unstake", "credit").unwrap(), "100");

    let account = bonder_account(&env);
    assert_eq!(account.credit, Uint128::new(100));
    assert_eq!(account.available, Uint128::zero());
    assert_eq!(env.balance(&env.bonder, BRIDGE_DENOM), INITIAL_BALANCE - 100 + 1);
}

#[test]
fn test_remove_bonder_with_outstanding_bonds_rejected() {
    let mut env = setup();

    env.stake(1000).unwrap();
    env.bond(&transfer(&env.recipient.clone(), 100, 1, 1)).unwrap();

    let res = env.app.execute_contract(
        env.governance.clone(),
        env.destination.clone(),
        &ExecuteMsg::RemoveBonder {
            address: env.bonder.to_string(),
        },
        &[],
    );
    let err_str = res.unwrap_err().root_cause().to_string();
    assert!(err_str.contains("outstanding"), "{}", err_str);
    assert!(bonder_account(&env).is_bonder);
}
