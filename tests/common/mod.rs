//! Common utilities for integration tests.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        Arc, Mutex,
    },
};

use alloy::{
    primitives::{address, Address, TxHash, U256},
    sol_types::SolCall,
};
use async_trait::async_trait;
use tokio::sync::Notify;

use token_swap_mcp::{
    error::{AppError, Result, TransactionError},
    ethereum::{
        contracts::{ITokenSwap, IERC20},
        ContractCall, WalletTransport,
    },
    types::TokenDescriptor,
    Config, SwapOrchestrator, TokenRegistry, TokenSwapServer, HARDHAT_CHAIN_ID,
};

pub const FUSDT: Address = address!("58d1fB5788283Bc6abb12cF958f56ABAAAf6CC7C");
pub const FUSDC: Address = address!("51e78127EA289f36E39d6685bd7e59468814c813");
pub const SWAP_CONTRACT: Address = address!("B80609D89eFE4b3e1A0Ab91d6c16BB520B762256");
/// First Hardhat/Foundry development account.
pub const ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const CHAIN_ID: u64 = HARDHAT_CHAIN_ID;

pub const APPROVE: &str = "approve(address,uint256)";
pub const SWAP: &str = "swap(address,address,uint256)";

/// In-memory wallet that plays the token and swap contracts.
///
/// Approvals set the allowance; swaps spend it and revert when it is short.
/// Hashes are `0x00..01`, `0x00..02`, ... in submission order.
#[derive(Default)]
pub struct MockWallet {
    connected: AtomicBool,
    nonce: AtomicU8,
    calls: Mutex<Vec<ContractCall>>,
    /// (token, owner, spender) -> allowance
    allowances: Mutex<HashMap<(Address, Address, Address), U256>>,
    /// Function signature -> error message returned instead of submitting.
    failures: Mutex<HashMap<&'static str, String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockWallet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn connected() -> Arc<Self> {
        let wallet = Self::new();
        wallet.connected.store(true, Ordering::SeqCst);
        wallet
    }

    /// Make every call to `function` fail with `message`.
    pub fn fail_on(&self, function: &'static str, message: &str) {
        self.failures.lock().unwrap().insert(function, message.to_string());
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// Hold the next submitted call until the returned handle is notified.
    pub fn hold_next_call(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn functions(&self) -> Vec<&'static str> {
        self.calls().iter().map(|c| c.function).collect()
    }

    pub fn allowance_of(&self, token: Address) -> U256 {
        self.allowances
            .lock()
            .unwrap()
            .get(&(token, ACCOUNT, SWAP_CONTRACT))
            .copied()
            .unwrap_or_default()
    }

    fn next_hash(&self) -> TxHash {
        TxHash::with_last_byte(self.nonce.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn execute(&self, call: &ContractCall) -> std::result::Result<(), TransactionError> {
        let mut allowances = self.allowances.lock().unwrap();
        match call.function {
            APPROVE => {
                let approve = IERC20::approveCall::abi_decode(&call.input)
                    .map_err(|e| TransactionError::Transport(e.to_string()))?;
                allowances.insert((call.to, ACCOUNT, approve.spender), approve.amount);
                Ok(())
            }
            SWAP => {
                let swap = ITokenSwap::swapCall::abi_decode(&call.input)
                    .map_err(|e| TransactionError::Transport(e.to_string()))?;
                let allowance = allowances.entry((swap.tokenIn, ACCOUNT, call.to)).or_default();
                if *allowance < swap.amountIn {
                    return Err(TransactionError::Reverted(
                        "execution reverted: ERC20: insufficient allowance".to_string(),
                    ));
                }
                *allowance -= swap.amountIn;
                Ok(())
            }
            other => Err(TransactionError::Transport(format!("unexpected call {other}"))),
        }
    }
}

#[async_trait]
impl WalletTransport for MockWallet {
    async fn connect(&self) -> Result<Address> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(ACCOUNT)
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn active_account(&self) -> Option<Address> {
        self.connected.load(Ordering::SeqCst).then_some(ACCOUNT)
    }

    async fn invoke(&self, call: ContractCall) -> std::result::Result<TxHash, TransactionError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.calls.lock().unwrap().push(call.clone());

        if call.chain_id != CHAIN_ID {
            return Err(TransactionError::Transport(format!("wrong chain {}", call.chain_id)));
        }
        let failure = self.failures.lock().unwrap().get(call.function).cloned();
        if let Some(message) = failure {
            return Err(TransactionError::classify(message));
        }

        self.execute(&call)?;
        Ok(self.next_hash())
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> std::result::Result<U256, TransactionError> {
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default())
    }
}

pub fn hash(n: u8) -> TxHash {
    TxHash::with_last_byte(n)
}

pub fn registry() -> Arc<TokenRegistry> {
    Arc::new(
        TokenRegistry::new(vec![
            TokenDescriptor::new("FUSDT", FUSDT, 6),
            TokenDescriptor::new("FUSDC", FUSDC, 6),
        ])
        .unwrap(),
    )
}

pub fn orchestrator(wallet: &Arc<MockWallet>) -> SwapOrchestrator {
    SwapOrchestrator::new(wallet.clone(), registry(), SWAP_CONTRACT, CHAIN_ID)
}

pub fn mock_server(wallet: &Arc<MockWallet>) -> TokenSwapServer {
    TokenSwapServer::with_orchestrator(orchestrator(wallet))
}

pub fn parse_json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap()
}

/// Helper to create a live server from environment variables.
pub fn create_test_server() -> Option<TokenSwapServer> {
    let config = Config::from_env().ok()?;
    config.private_key.as_ref()?;
    TokenSwapServer::new(config).ok()
}

pub fn expect_transaction_error(err: AppError) -> TransactionError {
    match err {
        AppError::Transaction(inner) => inner,
        other => panic!("Expected transaction error, got {other:?}"),
    }
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_test_server() {
            Some(server) => server,
            None => {
                eprintln!("Skipping test: RPC URL, private key or token addresses not set");
                return;
            }
        }
    };
}
