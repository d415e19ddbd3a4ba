//! MCP server implementation.

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    config::Config,
    error::AppError,
    ethereum::LocalWallet,
    services::{SwapOrchestrator, TokenRegistry},
    types::{format_units, shorten_address, SwapRequest, TokenInfo, TxAction},
};

/// Token Swap MCP Server.
///
/// Exposes the swap orchestrator: token listing, validation, approve and
/// swap actions, and the transaction status.
#[derive(Clone)]
pub struct TokenSwapServer {
    orchestrator: SwapOrchestrator,
    tool_router: ToolRouter<Self>,
}

impl TokenSwapServer {
    /// Create a new Token Swap MCP Server.
    ///
    /// Note: no network calls are made during startup. The node is first
    /// contacted when a transaction is submitted.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!("Initializing Token Swap MCP Server");

        let registry = Arc::new(TokenRegistry::new(config.tokens)?);
        let wallet = Arc::new(LocalWallet::new(&config.rpc_url, config.private_key.as_deref())?);
        let orchestrator =
            SwapOrchestrator::new(wallet, registry, config.swap_contract, config.chain_id);

        tracing::info!(
            swap_contract = %config.swap_contract,
            chain_id = config.chain_id,
            "Token Swap MCP Server initialized successfully"
        );

        Ok(Self::with_orchestrator(orchestrator))
    }

    /// Wrap an existing orchestrator, e.g. one driving a test wallet.
    pub fn with_orchestrator(orchestrator: SwapOrchestrator) -> Self {
        Self { orchestrator, tool_router: Self::tool_router() }
    }

    pub fn orchestrator(&self) -> &SwapOrchestrator {
        &self.orchestrator
    }

    async fn submit_action(
        &self,
        action: TxAction,
        input: SwapRequestInput,
    ) -> Result<String, McpError> {
        let submitted = self.orchestrator.submit(action, &input.into()).await?;

        to_json(&json!({
            "tx_hash": submitted.tx_hash.to_string(),
            "status": submitted.status.to_view(),
        }))
    }
}

/// Input parameters for tools that act on a swap request.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct SwapRequestInput {
    /// Input token symbol (e.g., "FUSDT").
    pub token_in: String,
    /// Output token symbol (e.g., "FUSDC").
    pub token_out: String,
    /// Amount to swap (human-readable, e.g., "1.5").
    pub amount: String,
}

impl From<SwapRequestInput> for SwapRequest {
    fn from(input: SwapRequestInput) -> Self {
        SwapRequest::new(input.token_in, input.token_out, input.amount)
    }
}

/// Input parameters for the get_allowance tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct AllowanceInput {
    /// Token symbol (e.g., "FUSDT").
    pub token: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[tool_router]
impl TokenSwapServer {
    /// Connect the signing wallet.
    #[tool(description = "Connect the signing wallet and return its address")]
    pub async fn connect_wallet(&self) -> Result<String, McpError> {
        tracing::info!("connect_wallet called");

        let address = self.orchestrator.connect_wallet().await?;

        to_json(&json!({
            "connected": true,
            "address": address.to_checksum(None),
            "display": shorten_address(&address),
        }))
    }

    /// Disconnect the signing wallet.
    #[tool(description = "Disconnect the signing wallet")]
    pub async fn disconnect_wallet(&self) -> Result<String, McpError> {
        tracing::info!("disconnect_wallet called");

        self.orchestrator.disconnect_wallet().await;

        to_json(&json!({ "connected": false }))
    }

    /// List the swappable tokens.
    #[tool(description = "List the tokens the swap contract trades, with addresses and decimals")]
    pub async fn list_tokens(&self) -> Result<String, McpError> {
        tracing::info!("list_tokens called");

        let tokens: Vec<TokenInfo> =
            self.orchestrator.list_tokens().iter().map(|t| t.to_info()).collect();

        to_json(&json!({
            "swap_contract": self.orchestrator.swap_contract().to_checksum(None),
            "chain_id": self.orchestrator.chain_id(),
            "tokens": tokens,
        }))
    }

    /// Check a swap request without submitting anything.
    #[tool(description = "Validate a swap request and return the amount in smallest units")]
    pub async fn validate_swap(
        &self,
        Parameters(input): Parameters<SwapRequestInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            token_in = %input.token_in,
            token_out = %input.token_out,
            amount = %input.amount,
            "validate_swap called"
        );

        let swap = self.orchestrator.validate(&input.into()).map_err(AppError::from)?;

        to_json(&json!({
            "valid": true,
            "token_in": swap.token_in.to_info(),
            "token_out": swap.token_out.to_info(),
            "amount_in": format_units(swap.amount.get(), swap.token_in.decimals),
            "amount_in_raw": swap.amount.to_string(),
        }))
    }

    /// Estimate the output of a swap locally.
    #[tool(
        description = "Estimate swap output locally at a 1:1 rate. Not an on-chain quote; no slippage is modelled."
    )]
    pub async fn estimate_output(
        &self,
        Parameters(input): Parameters<SwapRequestInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            token_in = %input.token_in,
            token_out = %input.token_out,
            amount = %input.amount,
            "estimate_output called"
        );

        let estimate = self.orchestrator.estimate_output(&input.into())?;

        to_json(&estimate)
    }

    /// Approve the swap contract for the requested amount.
    #[tool(
        description = "Approve the swap contract to spend exactly the given amount of the input token. Returns once the approval is submitted."
    )]
    pub async fn approve_only(
        &self,
        Parameters(input): Parameters<SwapRequestInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            token_in = %input.token_in,
            token_out = %input.token_out,
            amount = %input.amount,
            "approve_only called"
        );

        self.submit_action(TxAction::ApproveOnly, input).await
    }

    /// Approve and swap.
    #[tool(
        description = "Approve the swap contract, then swap token_in for token_out. The swap is only sent after the approval is submitted."
    )]
    pub async fn swap_tokens(
        &self,
        Parameters(input): Parameters<SwapRequestInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            token_in = %input.token_in,
            token_out = %input.token_out,
            amount = %input.amount,
            "swap_tokens called"
        );

        self.submit_action(TxAction::ApproveAndSwap, input).await
    }

    /// Swap without approving first.
    #[tool(
        description = "Send only the swap call, relying on an allowance granted earlier. Use to retry after a failed swap."
    )]
    pub async fn swap_only(
        &self,
        Parameters(input): Parameters<SwapRequestInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            token_in = %input.token_in,
            token_out = %input.token_out,
            amount = %input.amount,
            "swap_only called"
        );

        self.submit_action(TxAction::SwapOnly, input).await
    }

    /// Read the allowance granted to the swap contract.
    #[tool(description = "Read the allowance the connected wallet has granted the swap contract")]
    pub async fn get_allowance(
        &self,
        Parameters(input): Parameters<AllowanceInput>,
    ) -> Result<String, McpError> {
        tracing::info!(token = %input.token, "get_allowance called");

        let token = self.orchestrator.token(&input.token)?;
        let allowance = self.orchestrator.allowance(&input.token).await?;

        to_json(&json!({
            "token": token.to_info(),
            "spender": self.orchestrator.swap_contract().to_checksum(None),
            "allowance": format_units(allowance, token.decimals),
            "allowance_raw": allowance.to_string(),
        }))
    }

    /// Current transaction status.
    #[tool(description = "Get the status of the current or most recent transaction")]
    pub async fn get_tx_status(&self) -> Result<String, McpError> {
        to_json(&self.orchestrator.status().to_view())
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TokenSwapServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "token-swap-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Token Swap MCP Server. Connect the wallet, then approve and swap registered \
                 tokens through the swap contract. One transaction runs at a time."
                    .to_string(),
            ),
        }
    }
}
