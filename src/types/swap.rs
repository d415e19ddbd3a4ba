//! Swap-related types.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A user's proposed swap, built per action and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    /// Input token symbol.
    pub token_in: String,
    /// Output token symbol.
    pub token_out: String,
    /// Human-readable input amount (e.g., "1.5").
    pub amount_in: String,
    /// Account that signs, when known.
    pub wallet: Option<Address>,
}

impl SwapRequest {
    pub fn new(
        token_in: impl Into<String>,
        token_out: impl Into<String>,
        amount_in: impl Into<String>,
    ) -> Self {
        Self {
            token_in: token_in.into(),
            token_out: token_out.into(),
            amount_in: amount_in.into(),
            wallet: None,
        }
    }

    pub fn with_wallet(mut self, wallet: Address) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Same amount, input and output tokens exchanged.
    pub fn switched(&self) -> Self {
        Self {
            token_in: self.token_out.clone(),
            token_out: self.token_in.clone(),
            amount_in: self.amount_in.clone(),
            wallet: self.wallet,
        }
    }
}

/// Input amount in the input token's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScaledAmount(pub U256);

impl ScaledAmount {
    pub fn get(self) -> U256 {
        self.0
    }
}

impl std::fmt::Display for ScaledAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Local, non-authoritative output estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapEstimate {
    /// Input amount, normalized.
    pub amount_in: String,
    /// Input amount in smallest units.
    pub amount_in_raw: String,
    /// Estimated output amount.
    pub amount_out_estimate: String,
    /// Estimated output amount in smallest units.
    pub amount_out_estimate_raw: String,
    /// Assumed exchange rate (output per input).
    pub rate: String,
    /// Always false: no on-chain quote backs this figure.
    pub authoritative: bool,
}
