//! Error types and handling module.
//!
//! Three families of failure exist, each with its own enum:
//!
//! - [`ConfigError`]: fatal, raised while resolving configuration at startup.
//! - [`ValidationError`]: recoverable, raised before any network call.
//! - [`TransactionError`]: recoverable, raised by the wallet/transport after
//!   a call was handed over for submission.
//!
//! [`AppError`] wraps all of them for the public API.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Startup configuration failures. None of these has a degraded mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Key absent and no usable fallback.
    #[error("Environment variable {0} is missing")]
    MissingRequiredConfig(String),

    /// Key present but not a well-formed address.
    #[error("Invalid address in env var {key}: {value}")]
    InvalidAddress { key: String, value: String },

    /// Key present but not an integer in the supported decimals range.
    #[error("Invalid decimals in env var {key}: {value}")]
    InvalidDecimals { key: String, value: String },

    /// Key present but its value could not be parsed.
    #[error("Invalid value in env var {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Two tokens resolved to the same symbol.
    #[error("Duplicate token symbol: {0}")]
    DuplicateSymbol(String),

    /// A swap needs at least an input and an output token.
    #[error("At least two tokens are required, got {0}")]
    TooFewTokens(usize),
}

/// Pre-flight rejections of a swap request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Token in and token out cannot be the same: {0}")]
    SameToken(String),

    #[error("Amount {amount} has more precision than {decimals} decimals allow")]
    PrecisionOverflow { amount: String, decimals: u8 },
}

/// Failures reported by the wallet/transport for a submitted call.
///
/// `Display` is the collaborator's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// The user declined the request in the wallet.
    #[error("{0}")]
    UserRejected(String),

    /// The node rejected the call because execution reverted.
    #[error("{0}")]
    Reverted(String),

    /// Node or network failure.
    #[error("{0}")]
    Transport(String),
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// Registry lookup for a symbol that was never configured.
    #[error("Unknown token symbol: {0}")]
    UnknownSymbol(String),

    /// A previous approve or swap has not settled yet.
    #[error("Another transaction is already pending")]
    ActionInFlight,

    /// Wallet connection errors.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric overflow during conversion.
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),
}

impl From<alloy::signers::local::LocalSignerError> for AppError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        AppError::Wallet(err.to_string())
    }
}

impl From<alloy::transports::TransportError> for TransactionError {
    fn from(err: alloy::transports::TransportError) -> Self {
        TransactionError::classify(err.to_string())
    }
}

impl TransactionError {
    /// Sort a raw node or wallet message into a category, keeping the text.
    pub fn classify(message: String) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("user rejected") || lower.contains("user denied") {
            TransactionError::UserRejected(message)
        } else if lower.contains("revert") {
            TransactionError::Reverted(message)
        } else {
            TransactionError::Transport(message)
        }
    }
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(_)
            | AppError::UnknownSymbol(_)
            | AppError::Parse(_)
            | AppError::NumericOverflow(_) => McpError::invalid_params(err.to_string(), None),
            AppError::Config(_) | AppError::ActionInFlight => {
                McpError::invalid_request(err.to_string(), None)
            }
            // Surface the collaborator's message without the wrapper prefix.
            AppError::Transaction(inner) => McpError::internal_error(inner.to_string(), None),
            AppError::Wallet(_) => McpError::internal_error(err.to_string(), None),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
