//! JSON-RPC integration tests against an in-process devnet node.

mod common;

use serde_json::json;

use assure_core::{address_to_hex, KeyPair, Operation, U256};
use assure_node::node::Node;

use common::*;

#[tokio::test]
async fn test_pool_lifecycle() {
    let ctx = TestContext::new().await;
    let owner = KeyPair::from_seed("owner");
    let staker = KeyPair::from_seed("staker");
    ctx.fund(&owner).await;
    ctx.fund(&staker).await;

    let receipt = ctx
        .submit(&owner, Operation::CreatePool(pool_params("alpha")))
        .await;
    let receipt = &receipt["result"];
    assert_eq!(receipt["operation"], "create_pool");
    assert_eq!(receipt["pool_id"], 0);
    assert_eq!(receipt["state"], "initialized");
    assert_eq!(receipt["transfers"][0]["kind"], "pull");
    assert_eq!(parse_hex_amount(&receipt["transfers"][0]["amount"]), 1_000);

    assert_eq!(ctx.result("get_pools_length", json!([])).await, 1);
    assert_eq!(ctx.result("get_pool_index", json!(["alpha"])).await, 0);
    assert!(ctx.result("get_pool_index", json!(["beta"])).await.is_null());

    let receipt = ctx
        .submit(
            &staker,
            Operation::StakeFunds {
                pool_id: 0,
                amount: U256::from(100u64),
            },
        )
        .await;
    assert_eq!(receipt["result"]["state"], "not_violated_funded");

    let staker_hex = address_to_hex(&staker.address());
    let stake = ctx.result("get_stake", json!([0, staker_hex])).await;
    assert_eq!(parse_hex_amount(&stake["amount"]), 100);
    assert_eq!(stake["weight_bps"], 10_000);

    assert_eq!(ctx.result("devnet_advance", json!([10])).await, 10);
    let owed = ctx
        .result("compute_payout", json!([0, staker_hex]))
        .await;
    assert_eq!(parse_hex_amount(&owed), 200);
    let share = ctx
        .result("compute_period_payout", json!([0, staker_hex]))
        .await;
    assert_eq!(parse_hex_amount(&share), 100);

    let receipt = ctx
        .submit(&staker, Operation::WithdrawInterest { pool_id: 0 })
        .await;
    assert_eq!(receipt["result"]["state"], "not_violated_funded");
    assert_eq!(receipt["result"]["transfers"][0]["kind"], "payout");
    assert_eq!(ctx.balance(&staker).await, 1_000_000 - 100 + 200);

    let pool = ctx.result("get_pool", json!([0])).await;
    assert_eq!(pool["name"], "alpha");
    assert_eq!(pool["owner"], address_to_hex(&owner.address()));
    assert_eq!(parse_hex_amount(&pool["deposit"]), 800);
    assert_eq!(parse_hex_amount(&pool["total_staked"]), 100);
    assert_eq!(pool["stake_count"], 1);

    let escrow = ctx.result("get_escrow", json!([])).await;
    let escrow_balance = ctx.result("get_balance", json!([escrow])).await;
    assert_eq!(parse_hex_amount(&escrow_balance), 900);
}

#[tokio::test]
async fn test_violation_and_claim() {
    let ctx = TestContext::new().await;
    let owner = KeyPair::from_seed("owner");
    let staker = KeyPair::from_seed("staker");
    let watcher = KeyPair::from_seed("watcher");
    ctx.fund(&owner).await;
    ctx.fund(&staker).await;

    ctx.submit(&owner, Operation::CreatePool(pool_params("alpha")))
        .await;
    ctx.submit(
        &staker,
        Operation::StakeFunds {
            pool_id: 0,
            amount: U256::from(100u64),
        },
    )
    .await;

    // Nothing to report yet
    let response = ctx
        .submit(&watcher, Operation::CheckPolicy { pool_id: 0 })
        .await;
    assert_eq!(error_kind(&response), "illegal_transition");

    let candidate = address_to_hex(&[0xC0; 20]);
    ctx.result("devnet_set_violated", json!([candidate, true]))
        .await;

    let receipt = ctx
        .submit(&watcher, Operation::CheckPolicy { pool_id: 0 })
        .await;
    assert_eq!(receipt["result"]["previous_state"], "not_violated_funded");
    assert_eq!(receipt["result"]["state"], "violated_funded");

    let receipt = ctx
        .submit(&owner, Operation::WithdrawClaim { pool_id: 0 })
        .await;
    assert_eq!(receipt["result"]["state"], "violated_funded");
    assert_eq!(ctx.balance(&owner).await, 1_000_000 + 100);

    let state = ctx.result("get_pool_state", json!([0])).await;
    assert_eq!(state, "violated_funded");
}

#[tokio::test]
async fn test_error_responses() {
    let ctx = TestContext::new().await;
    let owner = KeyPair::from_seed("owner");
    let staker = KeyPair::from_seed("staker");
    ctx.fund(&owner).await;

    ctx.submit(&owner, Operation::CreatePool(pool_params("alpha")))
        .await;

    // Only the owner may withdraw the deposit
    let response = ctx
        .submit(&staker, Operation::WithdrawDeposit { pool_id: 0 })
        .await;
    assert_eq!(error_kind(&response), "unauthorized");

    // Owner cannot stake into their own pool
    let response = ctx
        .submit(
            &owner,
            Operation::StakeFunds {
                pool_id: 0,
                amount: U256::from(10u64),
            },
        )
        .await;
    assert_eq!(error_kind(&response), "unauthorized");

    // No allowance granted
    let response = ctx
        .submit(
            &staker,
            Operation::StakeFunds {
                pool_id: 0,
                amount: U256::from(10u64),
            },
        )
        .await;
    assert_eq!(error_kind(&response), "insufficient_funds");

    // Duplicate pool name
    let response = ctx
        .submit(&owner, Operation::CreatePool(pool_params("alpha")))
        .await;
    assert_eq!(error_kind(&response), "duplicate_name");

    // Unknown pool
    assert!(ctx.result("get_pool", json!([7])).await.is_null());
    assert_eq!(ctx.result("get_pool_state", json!([7])).await, "none");
    let response = ctx
        .call(
            "compute_payout",
            json!([7, address_to_hex(&staker.address())]),
        )
        .await;
    assert_eq!(error_kind(&response), "not_found");
    assert_eq!(response["error"]["code"], -32001);

    // Malformed envelope
    let response = ctx.call("stake_funds", json!(["zz"])).await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_envelope_checks() {
    let ctx = TestContext::new().await;
    let owner = KeyPair::from_seed("owner");
    ctx.fund(&owner).await;

    let signed = assure_core::SignedOperation::create(
        Operation::CreatePool(pool_params("alpha")),
        0,
        &owner,
    )
    .unwrap();
    let encoded = hex::encode(assure_core::serialization::serialize(&signed).unwrap());

    // Operation does not match the method
    let response = ctx.call("check_policy", json!([encoded])).await;
    assert_eq!(response["error"]["code"], -32602);

    let response = ctx.call("create_pool", json!([encoded])).await;
    assert!(response.get("error").is_none());
    let owner_hex = address_to_hex(&owner.address());
    assert_eq!(ctx.result("get_nonce", json!([owner_hex])).await, 1);

    // Replay is rejected and leaves the nonce alone
    let response = ctx.call("create_pool", json!([encoded])).await;
    assert_eq!(error_kind(&response), "invalid_argument");
    assert_eq!(ctx.result("get_nonce", json!([owner_hex])).await, 1);
}

#[tokio::test]
async fn test_expert_registry_controls() {
    let ctx = TestContext::new().await;
    let expert = address_to_hex(&KeyPair::from_seed("expert").address());

    assert_eq!(ctx.result("is_expert", json!([expert])).await, false);
    ctx.result("devnet_set_expert", json!([expert, true])).await;
    assert_eq!(ctx.result("is_expert", json!([expert])).await, true);
    ctx.result("devnet_set_expert", json!([expert, false])).await;
    assert_eq!(ctx.result("is_expert", json!([expert])).await, false);
}

#[tokio::test]
async fn test_devnet_methods_disabled() {
    let mut config = devnet_config(Default::default());
    config.devnet = None;
    config.tick_source = assure_node::cli::TickSource::System;
    let ctx = TestContext::with_config(config).await;

    let address = address_to_hex(&[0x11; 20]);
    let response = ctx.call("devnet_mint", json!([address])).await;
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Devnet mode not enabled");

    let response = ctx.call("devnet_advance", json!([1])).await;
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let owner = KeyPair::from_seed("owner");

    {
        let ctx = TestContext::with_config(devnet_config(dir.path().to_path_buf())).await;
        ctx.fund(&owner).await;
        ctx.submit(&owner, Operation::CreatePool(pool_params("alpha")))
            .await;
        ctx.node.save().await.unwrap();
        ctx.rpc_handle.stop().unwrap();
    }

    let node = Node::new(devnet_config(dir.path().to_path_buf()))
        .await
        .unwrap();
    let protocol = node.protocol().read().await;
    assert_eq!(protocol.get_pools_length(), 1);
    assert_eq!(protocol.get_pool_index("alpha"), Some(0));
    assert_eq!(protocol.nonce(&owner.address()), 1);
}
