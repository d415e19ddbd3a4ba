//! Token Registry.
//!
//! Holds the swappable tokens resolved at startup. The registry is built
//! once and exposes no mutation, so it can be shared freely behind an `Arc`.

use std::collections::HashMap;

use tracing::info;

use crate::{
    error::{AppError, ConfigError, Result},
    types::TokenDescriptor,
};

/// Immutable, ordered set of tokens with case-insensitive symbol lookup.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    /// Tokens in configuration order.
    tokens: Vec<TokenDescriptor>,
    /// Uppercased symbol -> index into `tokens`.
    by_symbol: HashMap<String, usize>,
}

impl TokenRegistry {
    /// Build the registry.
    ///
    /// # Errors
    /// Fewer than two tokens, or two tokens sharing a symbol (ignoring case).
    pub fn new(tokens: Vec<TokenDescriptor>) -> std::result::Result<Self, ConfigError> {
        if tokens.len() < 2 {
            return Err(ConfigError::TooFewTokens(tokens.len()));
        }

        let mut by_symbol = HashMap::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            if by_symbol.insert(token.symbol.to_uppercase(), index).is_some() {
                return Err(ConfigError::DuplicateSymbol(token.symbol.clone()));
            }
        }

        info!(count = tokens.len(), "Token registry built");

        Ok(Self { tokens, by_symbol })
    }

    /// All tokens, in configuration order.
    pub fn list_tokens(&self) -> &[TokenDescriptor] {
        &self.tokens
    }

    /// Look up a token by symbol (case-insensitive).
    pub fn by_symbol(&self, symbol: &str) -> Result<&TokenDescriptor> {
        self.by_symbol
            .get(&symbol.trim().to_uppercase())
            .map(|&index| &self.tokens[index])
            .ok_or_else(|| AppError::UnknownSymbol(symbol.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
