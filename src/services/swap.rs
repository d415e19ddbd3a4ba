//! Swap orchestration service.
//!
//! Sequences the allowance approval and the swap call against the wallet and
//! owns the transaction lifecycle. At most one action is in flight: a new
//! action is rejected with [`AppError::ActionInFlight`] while the lifecycle is
//! pending.
//!
//! A swap that fails after its approval was submitted leaves the allowance in
//! place. No revoke is sent, so [`SwapOrchestrator::swap_only`] can retry the
//! swap call alone.
//!
//! Dropping an action's future before it settles records
//! `Error("Transaction cancelled")`, so the next action can start.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::watch;

use crate::{
    error::{AppError, Result, TransactionError, ValidationError},
    ethereum::{
        contracts::{ITokenSwap, IERC20},
        ContractCall, WalletTransport,
    },
    services::{SwapRequestValidator, TokenRegistry, ValidatedSwap},
    types::{
        format_units, parse_units, u256_to_decimal, SubmittedTx, SwapEstimate, SwapRequest,
        TokenDescriptor, TxAction, TxKind, TxStatus,
    },
};

/// Output per unit of input assumed by the local estimate. The pool pairs
/// test stablecoins.
pub const ESTIMATE_RATE: Decimal = Decimal::ONE;

/// Error recorded when an action's future is dropped mid-flight.
pub const CANCELLED_MESSAGE: &str = "Transaction cancelled";

/// Drives approve and swap calls and publishes the resulting [`TxStatus`].
#[derive(Clone)]
pub struct SwapOrchestrator {
    wallet: Arc<dyn WalletTransport>,
    registry: Arc<TokenRegistry>,
    validator: SwapRequestValidator,
    /// TokenSwap contract: swap target and approval spender.
    swap_contract: Address,
    chain_id: u64,
    status: Arc<watch::Sender<TxStatus>>,
}

impl SwapOrchestrator {
    pub fn new(
        wallet: Arc<dyn WalletTransport>,
        registry: Arc<TokenRegistry>,
        swap_contract: Address,
        chain_id: u64,
    ) -> Self {
        let (status, _) = watch::channel(TxStatus::default());
        Self {
            wallet,
            validator: SwapRequestValidator::new(registry.clone()),
            registry,
            swap_contract,
            chain_id,
            status: Arc::new(status),
        }
    }

    pub fn list_tokens(&self) -> &[TokenDescriptor] {
        self.registry.list_tokens()
    }

    /// Look up a registered token by symbol.
    pub fn token(&self, symbol: &str) -> Result<&TokenDescriptor> {
        self.registry.by_symbol(symbol)
    }

    pub fn swap_contract(&self) -> Address {
        self.swap_contract
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Snapshot of the current lifecycle.
    pub fn status(&self) -> TxStatus {
        self.status.borrow().clone()
    }

    /// Receiver notified on every lifecycle transition.
    pub fn subscribe(&self) -> watch::Receiver<TxStatus> {
        self.status.subscribe()
    }

    pub async fn connect_wallet(&self) -> Result<Address> {
        self.wallet.connect().await
    }

    pub async fn disconnect_wallet(&self) {
        self.wallet.disconnect().await
    }

    pub fn active_account(&self) -> Option<Address> {
        self.wallet.active_account()
    }

    /// Validate against the wallet's current connection state.
    pub fn validate(
        &self,
        request: &SwapRequest,
    ) -> std::result::Result<ValidatedSwap, ValidationError> {
        self.validator.validate(request, self.wallet.active_account().is_some())
    }

    /// Approve the swap contract to spend exactly the requested amount.
    ///
    /// `Pending(Approve) -> Success | Error`.
    pub async fn approve_only(&self, request: &SwapRequest) -> Result<TxHash> {
        Ok(self.submit(TxAction::ApproveOnly, request).await?.tx_hash)
    }

    /// Approve, then swap once the approval has been accepted.
    ///
    /// `Pending(Approve) -> Pending(Swap) -> Success | Error`.
    pub async fn swap(&self, request: &SwapRequest) -> Result<TxHash> {
        Ok(self.submit(TxAction::ApproveAndSwap, request).await?.tx_hash)
    }

    /// Swap using an allowance granted earlier.
    ///
    /// `Pending(Swap) -> Success | Error`.
    pub async fn swap_only(&self, request: &SwapRequest) -> Result<TxHash> {
        Ok(self.submit(TxAction::SwapOnly, request).await?.tx_hash)
    }

    /// Local 1:1 estimate of the output amount. No chain read happens and
    /// the wallet need not be connected.
    pub fn estimate_output(&self, request: &SwapRequest) -> Result<SwapEstimate> {
        let swap = self.validator.validate(request, true)?;
        let amount_in = swap.amount.get();

        let overflow =
            || AppError::NumericOverflow(format!("amount {} is too large to estimate", amount_in));

        let estimate = u256_to_decimal(amount_in, swap.token_in.decimals)
            .and_then(|value| value.checked_mul(ESTIMATE_RATE))
            .ok_or_else(overflow)?
            .round_dp_with_strategy(u32::from(swap.token_out.decimals), RoundingStrategy::ToZero)
            .normalize();

        let amount_out = parse_units(&estimate.to_string(), swap.token_out.decimals)
            .map_err(|_| overflow())?;

        Ok(SwapEstimate {
            amount_in: format_units(amount_in, swap.token_in.decimals),
            amount_in_raw: amount_in.to_string(),
            amount_out_estimate: format_units(amount_out, swap.token_out.decimals),
            amount_out_estimate_raw: amount_out.to_string(),
            rate: ESTIMATE_RATE.to_string(),
            authoritative: false,
        })
    }

    /// Allowance the connected account has granted the swap contract.
    pub async fn allowance(&self, symbol: &str) -> Result<U256> {
        let owner = self.wallet.active_account().ok_or(ValidationError::NotConnected)?;
        let token = self.registry.by_symbol(symbol)?;
        Ok(self.wallet.allowance(token.address, owner, self.swap_contract).await?)
    }

    /// Run `action` and return its hash with the status captured when it
    /// settled. Later actions do not affect the returned snapshot.
    pub async fn submit(&self, action: TxAction, request: &SwapRequest) -> Result<SubmittedTx> {
        let swap = self.validate(request)?;

        if !self.status.send_if_modified(|status| status.begin(action)) {
            tracing::warn!(action = ?action, "Rejected action while another is pending");
            return Err(AppError::ActionInFlight);
        }
        let guard = PendingGuard::new(&self.status, action);

        tracing::info!(
            action = ?action,
            token_in = %swap.token_in.symbol,
            token_out = %swap.token_out.symbol,
            amount = %swap.amount,
            "Starting transaction"
        );

        let result = self.execute(action, &swap).await;
        guard.disarm();

        match result {
            Ok(tx_hash) => {
                let mut snapshot = TxStatus::default();
                tracing::info!(action = ?action, tx_hash = %tx_hash, "Transaction submitted");
                self.status.send_modify(|status| {
                    status.succeed(tx_hash);
                    snapshot = status.clone();
                });
                Ok(SubmittedTx { tx_hash, status: snapshot })
            }
            Err(err) => {
                tracing::warn!(action = ?action, error = %err, "Transaction failed");
                self.status.send_modify(|status| status.fail(err.to_string()));
                Err(err.into())
            }
        }
    }

    async fn execute(
        &self,
        action: TxAction,
        swap: &ValidatedSwap,
    ) -> std::result::Result<TxHash, TransactionError> {
        match action {
            TxAction::ApproveOnly => self.submit_approval(swap).await,
            TxAction::ApproveAndSwap => {
                let approval = self.submit_approval(swap).await?;
                self.status.send_modify(|status| status.advance(approval, TxKind::Swap));
                self.submit_swap(swap).await
            }
            TxAction::SwapOnly => self.submit_swap(swap).await,
        }
    }

    async fn submit_approval(
        &self,
        swap: &ValidatedSwap,
    ) -> std::result::Result<TxHash, TransactionError> {
        let approve =
            IERC20::approveCall { spender: self.swap_contract, amount: swap.amount.get() };

        tracing::info!(
            token = %swap.token_in.address,
            spender = %self.swap_contract,
            amount = %swap.amount,
            "Requesting allowance approval"
        );

        self.wallet.invoke(ContractCall::new(swap.token_in.address, &approve, self.chain_id)).await
    }

    async fn submit_swap(
        &self,
        swap: &ValidatedSwap,
    ) -> std::result::Result<TxHash, TransactionError> {
        let call = ITokenSwap::swapCall {
            tokenIn: swap.token_in.address,
            tokenOut: swap.token_out.address,
            amountIn: swap.amount.get(),
        };

        tracing::info!(
            swap_contract = %self.swap_contract,
            token_in = %swap.token_in.address,
            token_out = %swap.token_out.address,
            amount = %swap.amount,
            "Requesting swap"
        );

        self.wallet.invoke(ContractCall::new(self.swap_contract, &call, self.chain_id)).await
    }
}

/// Fails the pending action if its future is dropped before it settles,
/// e.g. under a timeout or `select!`, so the busy gate reopens.
struct PendingGuard<'a> {
    status: &'a watch::Sender<TxStatus>,
    action: TxAction,
    armed: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(status: &'a watch::Sender<TxStatus>, action: TxAction) -> Self {
        Self { status, action, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(action = ?self.action, "Transaction cancelled before it settled");
            self.status.send_modify(|status| status.fail(CANCELLED_MESSAGE.to_string()));
        }
    }
}
