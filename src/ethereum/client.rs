//! Ethereum RPC client.

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::{
    error::{AppError, Result, TransactionError},
    ethereum::contracts::IERC20,
};

/// Type-erased provider, with a signing wallet filler when a key is configured.
pub type HttpProvider = DynProvider<Ethereum>;

/// Ethereum RPC client wrapper with lazy initialization.
#[derive(Clone)]
pub struct EthereumClient {
    /// The underlying provider.
    provider: HttpProvider,
    /// RPC URL for logging.
    rpc_url: String,
    /// Lazily initialized chain ID.
    chain_id: Arc<OnceCell<u64>>,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|_| AppError::Parse(format!("Invalid RPC URL: {}", rpc_url)))?;

        #[allow(deprecated)]
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        tracing::info!(rpc_url = %rpc_url, "Ethereum client created (lazy initialization)");

        Ok(Self { provider, rpc_url: rpc_url.to_string(), chain_id: Arc::new(OnceCell::new()) })
    }

    /// Get the chain ID (fetches from network on first call).
    pub async fn chain_id(&self) -> std::result::Result<u64, TransactionError> {
        self.chain_id
            .get_or_try_init(|| async {
                let chain_id = self.provider.get_chain_id().await?;
                tracing::info!(
                    chain_id = chain_id,
                    rpc_url = %self.rpc_url,
                    "Connected to Ethereum node"
                );
                Ok::<_, TransactionError>(chain_id)
            })
            .await
            .copied()
    }

    /// Sign and broadcast a transaction.
    ///
    /// Returns once the node accepts it; does not wait for a receipt.
    pub async fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> std::result::Result<TxHash, TransactionError> {
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    /// Read an ERC20 allowance.
    pub async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> std::result::Result<U256, TransactionError> {
        let contract = IERC20::new(token, self.provider.clone());
        contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| TransactionError::classify(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rejects_bad_url() {
        let result = EthereumClient::new("not a url", None);
        assert!(matches!(result, Err(AppError::Parse(_))));
    }
}
