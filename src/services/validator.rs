//! Pre-flight validation of swap requests.
//!
//! Every check here is pure, so a request that cannot succeed is turned away
//! before the wallet is ever asked to sign anything.

use std::sync::Arc;

use crate::{
    error::ValidationError,
    services::TokenRegistry,
    types::{Numeral, ScaledAmount, SwapRequest, TokenDescriptor},
};

/// A request that passed every check, with its tokens resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSwap {
    pub token_in: TokenDescriptor,
    pub token_out: TokenDescriptor,
    /// `amount_in` in the input token's smallest unit.
    pub amount: ScaledAmount,
}

/// Checks a [`SwapRequest`] against the registry and the wallet state.
#[derive(Debug, Clone)]
pub struct SwapRequestValidator {
    registry: Arc<TokenRegistry>,
}

impl SwapRequestValidator {
    pub fn new(registry: Arc<TokenRegistry>) -> Self {
        Self { registry }
    }

    /// Validate a request.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// connection, amount syntax and sign, token lookup, token pair, precision.
    pub fn validate(
        &self,
        request: &SwapRequest,
        wallet_connected: bool,
    ) -> Result<ValidatedSwap, ValidationError> {
        let result = self.check(request, wallet_connected);
        if let Err(ref reason) = result {
            tracing::debug!(
                token_in = %request.token_in,
                token_out = %request.token_out,
                amount = %request.amount_in,
                reason = %reason,
                "Swap request rejected"
            );
        }
        result
    }

    fn check(
        &self,
        request: &SwapRequest,
        wallet_connected: bool,
    ) -> Result<ValidatedSwap, ValidationError> {
        if !wallet_connected {
            return Err(ValidationError::NotConnected);
        }

        let numeral = Numeral::parse(&request.amount_in)
            .map_err(|e| ValidationError::InvalidAmount(e.to_string()))?;
        if numeral.is_zero() {
            return Err(ValidationError::InvalidAmount("Amount must be greater than zero".into()));
        }

        let token_in = self.resolve(&request.token_in)?;
        let token_out = self.resolve(&request.token_out)?;

        if token_in.symbol == token_out.symbol || token_in.address == token_out.address {
            return Err(ValidationError::SameToken(token_in.symbol.clone()));
        }

        let amount = numeral.scale(token_in.decimals).map_err(|_| {
            ValidationError::PrecisionOverflow {
                amount: request.amount_in.trim().to_string(),
                decimals: token_in.decimals,
            }
        })?;

        Ok(ValidatedSwap {
            token_in: token_in.clone(),
            token_out: token_out.clone(),
            amount: ScaledAmount(amount),
        })
    }

    fn resolve(&self, symbol: &str) -> Result<&TokenDescriptor, ValidationError> {
        self.registry
            .by_symbol(symbol)
            .map_err(|_| ValidationError::UnknownToken(symbol.to_string()))
    }
}
