//! Shared test helpers for assure-node integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use reqwest::Client;
use serde_json::{json, Value};

use assure_core::serialization::serialize;
use assure_core::{address_to_hex, KeyPair, Operation, PoolParams, SignedOperation, U256};

use assure_node::cli::TickSource;
use assure_node::config::NodeConfig;
use assure_node::devnet::DevnetConfig;
use assure_node::node::Node;
use assure_node::rpc::RpcServerHandle;

/// Make a JSON-RPC request.
pub async fn rpc_call(client: &Client, url: &str, method: &str, params: Value) -> Value {
    let body = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1
    });

    let response = client
        .post(url)
        .json(&body)
        .send()
        .await
        .expect("RPC request failed");

    response.json().await.expect("Failed to parse JSON response")
}

/// Configuration for an in-process devnet node.
pub fn devnet_config(data_dir: PathBuf) -> NodeConfig {
    NodeConfig {
        data_dir,
        rpc_addr: "127.0.0.1:0".parse().unwrap(),
        devnet: Some(DevnetConfig::default()),
        tick_source: TickSource::Manual,
        ..NodeConfig::default()
    }
}

/// Pool parameters: payout 100 per 5-tick period, min stake 10,
/// deposit 1000, timeout 100, staking phase 1000.
pub fn pool_params(name: &str) -> PoolParams {
    PoolParams {
        candidate_contract: [0xC0; 20],
        policy: [0xB0; 20],
        max_payout_per_period: U256::from(100u64),
        min_stake: U256::from(10u64),
        deposit: U256::from(1_000u64),
        bonus_expert_factor: 0,
        bonus_first_expert_factor: 0,
        pay_period_length: 5,
        min_stake_duration: 1_000,
        timeout_duration: 100,
        report_url: "https://reports.example/audit.pdf".into(),
        pool_name: name.into(),
        max_total_stake: U256::from(1_000u64),
    }
}

/// Test context: a devnet node with its RPC server running.
pub struct TestContext {
    pub client: Client,
    pub url: String,
    pub node: Node,
    pub rpc_handle: RpcServerHandle,
}

impl TestContext {
    /// Start a devnet node without persistence.
    pub async fn new() -> Self {
        Self::with_config(devnet_config(PathBuf::new())).await
    }

    /// Start a node with the given configuration.
    pub async fn with_config(config: NodeConfig) -> Self {
        let node = Node::new(config).await.expect("Failed to create node");
        let rpc_handle = node.start_rpc().await.expect("Failed to start RPC");
        let url = format!("http://{}", rpc_handle.local_addr());

        Self {
            client: Client::new(),
            url,
            node,
            rpc_handle,
        }
    }

    /// Call a method and return the full response.
    pub async fn call(&self, method: &str, params: Value) -> Value {
        rpc_call(&self.client, &self.url, method, params).await
    }

    /// Call a method and return its result, failing on an error response.
    pub async fn result(&self, method: &str, params: Value) -> Value {
        let response = self.call(method, params).await;
        assert!(
            response.get("error").is_none(),
            "{} failed: {}",
            method,
            response
        );
        response["result"].clone()
    }

    /// Mint faucet funds to `keypair` and approve the escrow for all of it.
    pub async fn fund(&self, keypair: &KeyPair) {
        let address = address_to_hex(&keypair.address());
        self.result("devnet_mint", json!([address])).await;
        self.result("devnet_approve", json!([address, "1000000"]))
            .await;
    }

    /// Sign `op` with the signer's next nonce and submit it.
    pub async fn submit(&self, keypair: &KeyPair, op: Operation) -> Value {
        let method = op.kind().name();
        let nonce = self
            .result("get_nonce", json!([address_to_hex(&keypair.address())]))
            .await
            .as_u64()
            .unwrap();
        let signed = SignedOperation::create(op, nonce, keypair).unwrap();
        self.call(method, json!([hex::encode(serialize(&signed).unwrap())]))
            .await
    }

    /// Balance of `keypair` as a number.
    pub async fn balance(&self, keypair: &KeyPair) -> u64 {
        let result = self
            .result("get_balance", json!([address_to_hex(&keypair.address())]))
            .await;
        parse_hex_amount(&result)
    }
}

/// Parse a 0x-prefixed hex amount that fits in u64.
pub fn parse_hex_amount(value: &Value) -> u64 {
    let text = value.as_str().unwrap().trim_start_matches("0x");
    u64::from_str_radix(text.trim_start_matches('0'), 16).unwrap_or(0)
}

/// Error kind carried in an error response.
pub fn error_kind(response: &Value) -> &str {
    response["error"]["data"]["kind"].as_str().unwrap_or("")
}
