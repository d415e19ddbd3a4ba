//! Integration tests for server initialization and read-only tools.
//!
//! Run with: `cargo test --test test_server`

mod common;

use common::{mock_server, parse_json, MockWallet};
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{ErrorCode, ServerInfo},
    ServerHandler,
};
use token_swap_mcp::{
    config::{Config, ConfigResolver},
    mcp::SwapRequestInput,
    AppError, TokenSwapServer,
};
use tokio_test::assert_ok;

fn input(token_in: &str, token_out: &str, amount: &str) -> Parameters<SwapRequestInput> {
    Parameters(SwapRequestInput {
        token_in: token_in.to_string(),
        token_out: token_out.to_string(),
        amount: amount.to_string(),
    })
}

/// Test server info.
#[test]
fn test_server_info() {
    let server = mock_server(&MockWallet::new());
    let info: ServerInfo = server.get_info();

    assert_eq!(info.server_info.name, "token-swap-mcp");
    assert!(!info.server_info.version.is_empty());
    assert!(info.capabilities.tools.is_some());
}

/// The server builds from configuration alone, without touching the network.
#[test]
fn test_server_from_config() {
    let resolver = ConfigResolver::from_vars([
        ("ETHEREUM_RPC_URL", "http://localhost:8545"),
        ("FAKE_USDT_ADDRESS", "0x58d1fB5788283Bc6abb12cF958f56ABAAAf6CC7C"),
        ("FAKE_USDC_ADDRESS", "0x51e78127EA289f36E39d6685bd7e59468814c813"),
    ]);
    let config = assert_ok!(Config::resolve(&resolver));

    let server = assert_ok!(TokenSwapServer::new(config));
    assert_eq!(server.orchestrator().list_tokens().len(), 2);
    assert!(server.orchestrator().active_account().is_none());
}

#[test]
fn test_server_rejects_same_symbols() {
    let resolver = ConfigResolver::from_vars([
        ("ETHEREUM_RPC_URL", "http://localhost:8545"),
        ("FAKE_USDT_ADDRESS", "0x58d1fB5788283Bc6abb12cF958f56ABAAAf6CC7C"),
        ("FAKE_USDC_ADDRESS", "0x51e78127EA289f36E39d6685bd7e59468814c813"),
        ("FAKE_USDC_SYMBOL", "FUSDT"),
    ]);
    let config = assert_ok!(Config::resolve(&resolver));

    assert!(matches!(TokenSwapServer::new(config), Err(AppError::Config(_))));
}

#[tokio::test]
async fn test_list_tokens() {
    let server = mock_server(&MockWallet::new());

    let parsed = parse_json(&server.list_tokens().await.unwrap());

    assert_eq!(parsed["swap_contract"], "0xB80609D89eFE4b3e1A0Ab91d6c16BB520B762256");
    assert_eq!(parsed["chain_id"], common::CHAIN_ID);

    let tokens = parsed["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0]["symbol"], "FUSDT");
    assert_eq!(tokens[0]["address"], "0x58d1fB5788283Bc6abb12cF958f56ABAAAf6CC7C");
    assert_eq!(tokens[0]["decimals"], 6);
    assert_eq!(tokens[1]["symbol"], "FUSDC");
}

#[tokio::test]
async fn test_connect_and_disconnect_wallet() {
    let wallet = MockWallet::new();
    let server = mock_server(&wallet);

    let parsed = parse_json(&server.connect_wallet().await.unwrap());
    assert_eq!(parsed["connected"], true);
    assert_eq!(parsed["address"], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    assert_eq!(parsed["display"], "0xf39F...2266");
    assert_eq!(server.orchestrator().active_account(), Some(common::ACCOUNT));

    let parsed = parse_json(&server.disconnect_wallet().await.unwrap());
    assert_eq!(parsed["connected"], false);
    assert!(server.orchestrator().active_account().is_none());
}

#[tokio::test]
async fn test_validate_swap() {
    let server = mock_server(&MockWallet::connected());

    let parsed = parse_json(&server.validate_swap(input("fusdt", "FUSDC", "1.5")).await.unwrap());

    assert_eq!(parsed["valid"], true);
    assert_eq!(parsed["token_in"]["symbol"], "FUSDT");
    assert_eq!(parsed["token_out"]["symbol"], "FUSDC");
    assert_eq!(parsed["amount_in"], "1.5");
    assert_eq!(parsed["amount_in_raw"], "1500000");
}

#[tokio::test]
async fn test_validate_swap_rejections_are_invalid_params() {
    let server = mock_server(&MockWallet::connected());

    let err = server.validate_swap(input("FUSDT", "FUSDT", "10")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("cannot be the same"));

    let err = server.validate_swap(input("FUSDT", "FUSDC", "-1")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

    let err = server.validate_swap(input("FUSDT", "WETH", "1")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("WETH"));
}

#[tokio::test]
async fn test_validate_swap_requires_wallet() {
    let server = mock_server(&MockWallet::new());

    let err = server.validate_swap(input("FUSDT", "FUSDC", "1")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("Please connect your wallet first"));
}

#[tokio::test]
async fn test_estimate_output() {
    let server = mock_server(&MockWallet::new());

    let parsed = parse_json(&server.estimate_output(input("FUSDT", "FUSDC", "10")).await.unwrap());

    assert_eq!(parsed["amount_in"], "10");
    assert_eq!(parsed["amount_out_estimate"], "10");
    assert_eq!(parsed["amount_out_estimate_raw"], "10000000");
    assert_eq!(parsed["authoritative"], false);
}

#[tokio::test]
async fn test_get_tx_status_idle() {
    let server = mock_server(&MockWallet::new());

    let parsed = parse_json(&server.get_tx_status().await.unwrap());

    assert_eq!(parsed["phase"], "idle");
    assert!(parsed.get("tx_hash").is_none());
    assert!(parsed.get("error").is_none());
    assert!(parsed.get("message").is_none());
}
