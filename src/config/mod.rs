//! Configuration management module.
//!
//! The environment is read exactly once, into a [`ConfigResolver`] snapshot.
//! [`Config`] is resolved from that snapshot at startup and handed to the
//! services by value; nothing downstream looks at the environment again.

use std::{collections::HashMap, env, str::FromStr};

use alloy::primitives::Address;

use crate::{
    error::{AppError, ConfigError},
    ethereum::constants::{DEFAULT_CHAIN_ID, DEFAULT_TOKEN_DECIMALS, FALLBACK_TOKEN_SWAP_ADDRESS},
    types::{parse_address, TokenDescriptor, MAX_DECIMALS},
};

/// Environment variable names.
pub mod keys {
    pub const ETHEREUM_RPC_URL: &str = "ETHEREUM_RPC_URL";
    pub const ETHEREUM_PRIVATE_KEY: &str = "ETHEREUM_PRIVATE_KEY";
    pub const CHAIN_ID: &str = "CHAIN_ID";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const TOKEN_SWAP_ADDRESS: &str = "TOKEN_SWAP_ADDRESS";
}

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Keys describing one swappable token.
#[derive(Debug, Clone, Copy)]
pub struct TokenSlot {
    pub address_key: &'static str,
    pub symbol_key: &'static str,
    pub decimals_key: &'static str,
    pub default_symbol: &'static str,
}

/// The tokens the swap contract trades, in display order.
pub const TOKEN_SLOTS: [TokenSlot; 2] = [
    TokenSlot {
        address_key: "FAKE_USDT_ADDRESS",
        symbol_key: "FAKE_USDT_SYMBOL",
        decimals_key: "FAKE_USDT_DECIMALS",
        default_symbol: "FUSDT",
    },
    TokenSlot {
        address_key: "FAKE_USDC_ADDRESS",
        symbol_key: "FAKE_USDC_SYMBOL",
        decimals_key: "FAKE_USDC_DECIMALS",
        default_symbol: "FUSDC",
    },
];

/// Snapshot of named configuration values with typed, validating lookups.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    vars: HashMap<String, String>,
}

impl ConfigResolver {
    /// Snapshot the process environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self { vars: env::vars().collect() }
    }

    /// Build from explicit pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Blank values count as absent.
    fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    /// Resolve a checksum-normalized address.
    ///
    /// A present value must be valid; the fallback only applies when the key
    /// is absent, and is logged.
    pub fn resolve_address(
        &self,
        key: &str,
        fallback: Option<&str>,
    ) -> Result<Address, ConfigError> {
        if let Some(value) = self.get(key) {
            return parse_address(value).map_err(|_| ConfigError::InvalidAddress {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        match fallback.map(parse_address) {
            Some(Ok(address)) => {
                tracing::warn!(key = key, fallback = %address, "Using fallback address");
                Ok(address)
            }
            _ => Err(ConfigError::MissingRequiredConfig(key.to_string())),
        }
    }

    pub fn resolve_symbol(&self, key: &str, fallback: &str) -> String {
        self.get(key).unwrap_or(fallback).to_string()
    }

    /// Resolve a token scale; present values must be integers in `0..=77`.
    pub fn resolve_decimals(&self, key: &str, fallback: u8) -> Result<u8, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(fallback);
        };

        value.parse::<u8>().ok().filter(|d| *d <= MAX_DECIMALS).ok_or_else(|| {
            ConfigError::InvalidDecimals { key: key.to_string(), value: value.to_string() }
        })
    }

    pub fn resolve_required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingRequiredConfig(key.to_string()))
    }

    pub fn resolve_optional(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Log filter directive. Read before [`Config::resolve`] so that logging
    /// is up when fallbacks are reported.
    pub fn log_level(&self) -> String {
        self.resolve_optional(keys::LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.into())
    }

    /// Parse a value, or use `default` when absent.
    pub fn resolve_parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!("{}: {}", value, e),
            }),
        }
    }

    /// Resolve one token descriptor from its slot.
    pub fn resolve_token(&self, slot: &TokenSlot) -> Result<TokenDescriptor, ConfigError> {
        Ok(TokenDescriptor {
            symbol: self.resolve_symbol(slot.symbol_key, slot.default_symbol),
            address: self.resolve_address(slot.address_key, None)?,
            decimals: self.resolve_decimals(slot.decimals_key, DEFAULT_TOKEN_DECIMALS)?,
        })
    }
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Private key for the signing wallet (hex). Without it no action can run.
    pub private_key: Option<String>,
    /// Chain every call targets (default: Sepolia).
    pub chain_id: u64,
    /// TokenSwap contract address, also the approval spender.
    pub swap_contract: Address,
    /// Swappable tokens, in display order.
    pub tokens: Vec<TokenDescriptor>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ETHEREUM_RPC_URL`: Ethereum JSON-RPC endpoint
    /// - `FAKE_USDT_ADDRESS`, `FAKE_USDC_ADDRESS`: token contracts
    ///
    /// Optional environment variables:
    /// - `ETHEREUM_PRIVATE_KEY`: signing key (hex)
    /// - `TOKEN_SWAP_ADDRESS`: swap contract (falls back to the Sepolia deployment)
    /// - `FAKE_*_SYMBOL`, `FAKE_*_DECIMALS`: token overrides (defaults FUSDT/FUSDC, 6)
    /// - `CHAIN_ID`: target chain (default: 11155111)
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::resolve(&ConfigResolver::from_env())?)
    }

    /// Resolve every setting from a snapshot. Any error is fatal.
    pub fn resolve(resolver: &ConfigResolver) -> Result<Self, ConfigError> {
        let rpc_url = resolver.resolve_required(keys::ETHEREUM_RPC_URL)?;
        let private_key = resolver.resolve_optional(keys::ETHEREUM_PRIVATE_KEY);
        let chain_id = resolver.resolve_parsed(keys::CHAIN_ID, DEFAULT_CHAIN_ID)?;
        let swap_contract =
            resolver.resolve_address(keys::TOKEN_SWAP_ADDRESS, Some(FALLBACK_TOKEN_SWAP_ADDRESS))?;

        let tokens = TOKEN_SLOTS
            .iter()
            .map(|slot| resolver.resolve_token(slot))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rpc_url, private_key, chain_id, swap_contract, tokens })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("chain_id", &self.chain_id)
            .field("swap_contract", &self.swap_contract)
            .field("tokens", &self.tokens)
            .finish()
    }
}
