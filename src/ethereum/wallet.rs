//! Wallet connection and transaction submission.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use alloy::{
    primitives::{Address, Bytes, TxHash, U256},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use async_trait::async_trait;

use crate::{
    error::{AppError, Result, TransactionError},
    ethereum::EthereumClient,
};

/// An encoded contract invocation ready to hand to a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Target contract.
    pub to: Address,
    /// Solidity signature of the called function, e.g. `approve(address,uint256)`.
    pub function: &'static str,
    /// ABI-encoded calldata, selector included.
    pub input: Bytes,
    /// Chain the call is meant for.
    pub chain_id: u64,
}

impl ContractCall {
    pub fn new<C: SolCall>(to: Address, call: &C, chain_id: u64) -> Self {
        Self { to, function: C::SIGNATURE, input: call.abi_encode().into(), chain_id }
    }
}

/// The wallet side of a swap: account connection plus call submission.
///
/// `invoke` resolves once the call is accepted for broadcast, not when it is
/// mined. It has no timeout; a wallet that never answers keeps the caller
/// waiting.
#[async_trait]
pub trait WalletTransport: Send + Sync {
    /// Connect and return the active account.
    async fn connect(&self) -> Result<Address>;

    async fn disconnect(&self);

    /// The connected account, if any.
    fn active_account(&self) -> Option<Address>;

    /// Sign and submit a contract call, returning its transaction hash.
    async fn invoke(&self, call: ContractCall) -> std::result::Result<TxHash, TransactionError>;

    /// Current allowance `owner` has granted `spender` on `token`.
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> std::result::Result<U256, TransactionError>;
}

/// Parse a hex private key, with or without the 0x prefix.
pub fn parse_signer(private_key: &str) -> Result<PrivateKeySigner> {
    let key = private_key.strip_prefix("0x").unwrap_or(private_key);
    let signer: PrivateKeySigner = key.parse()?;
    Ok(signer)
}

/// Wallet backed by a local private key and an RPC node.
pub struct LocalWallet {
    client: Arc<EthereumClient>,
    /// Signer address, absent when no key is configured.
    address: Option<Address>,
    connected: AtomicBool,
}

impl LocalWallet {
    /// Create a wallet for `rpc_url`. Without a key it can never connect.
    pub fn new(rpc_url: &str, private_key: Option<&str>) -> Result<Self> {
        let signer = private_key.map(parse_signer).transpose()?;
        let address = signer.as_ref().map(|s| s.address());
        let client = Arc::new(EthereumClient::new(rpc_url, signer)?);

        match address {
            Some(address) => tracing::info!(address = %address, "Wallet initialized"),
            None => tracing::warn!("No private key configured, wallet cannot connect"),
        }

        Ok(Self { client, address, connected: AtomicBool::new(false) })
    }

    /// Signer address whether or not connected.
    pub fn address(&self) -> Option<Address> {
        self.address
    }
}

#[async_trait]
impl WalletTransport for LocalWallet {
    async fn connect(&self) -> Result<Address> {
        let address = self.address.ok_or_else(|| {
            AppError::Wallet("No signer configured; set ETHEREUM_PRIVATE_KEY".into())
        })?;
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!(address = %address, "Wallet connected");
        Ok(address)
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        tracing::info!("Wallet disconnected");
    }

    fn active_account(&self) -> Option<Address> {
        self.address.filter(|_| self.connected.load(Ordering::SeqCst))
    }

    async fn invoke(&self, call: ContractCall) -> std::result::Result<TxHash, TransactionError> {
        let from = self
            .active_account()
            .ok_or_else(|| TransactionError::Transport("Wallet is not connected".into()))?;

        let node_chain = self.client.chain_id().await?;
        if node_chain != call.chain_id {
            return Err(TransactionError::Transport(format!(
                "Chain mismatch: node is on chain {}, call targets chain {}",
                node_chain, call.chain_id
            )));
        }

        tracing::info!(
            to = %call.to,
            function = call.function,
            from = %from,
            "Submitting contract call"
        );

        let mut tx = TransactionRequest::default().to(call.to).input(call.input.into()).from(from);
        tx.chain_id = Some(call.chain_id);

        let hash = self.client.send_transaction(tx).await?;
        tracing::info!(tx_hash = %hash, function = call.function, "Contract call submitted");
        Ok(hash)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> std::result::Result<U256, TransactionError> {
        self.client.allowance(token, owner, spender).await
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .finish()
    }
}
