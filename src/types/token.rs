//! Token-related types and unit conversions.

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest decimal scale whose power of ten still fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

/// A swappable token, resolved once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    /// Token symbol (e.g., "FUSDT").
    pub symbol: String,
    /// Token contract address.
    pub address: Address,
    /// Number of decimals.
    pub decimals: u8,
}

impl TokenDescriptor {
    pub fn new(symbol: impl Into<String>, address: Address, decimals: u8) -> Self {
        Self { symbol: symbol.into(), address, decimals }
    }

    /// Serializable view with a checksum-cased address.
    pub fn to_info(&self) -> TokenInfo {
        TokenInfo {
            symbol: self.symbol.clone(),
            address: self.address.to_checksum(None),
            decimals: self.decimals,
        }
    }
}

/// Information about a token as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token symbol.
    pub symbol: String,
    /// Checksummed token contract address.
    pub address: String,
    /// Number of decimals.
    pub decimals: u8,
}

/// Reasons a decimal string cannot be turned into smallest units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("Amount cannot be empty")]
    Empty,

    #[error("Amount cannot be negative")]
    Negative,

    #[error("Not a decimal number: {0}")]
    Malformed(String),

    #[error("{found} fractional digits exceed the {allowed} allowed")]
    TooManyDecimals { found: usize, allowed: u8 },

    #[error("Amount does not fit in 256 bits")]
    Overflow,
}

/// A syntactically valid, unsigned decimal numeral split at the point.
///
/// Accepts `"10"`, `"10.5"`, `".5"` and `"5."`. Signs, exponents, separators
/// and a lone `"."` are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numeral<'a> {
    pub integer: &'a str,
    pub fraction: &'a str,
}

impl<'a> Numeral<'a> {
    pub fn parse(amount: &'a str) -> Result<Self, UnitsError> {
        let amount = amount.trim();

        if amount.is_empty() {
            return Err(UnitsError::Empty);
        }

        if amount.starts_with('-') {
            return Err(UnitsError::Negative);
        }

        let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

        let empty = integer.is_empty() && fraction.is_empty();
        if empty || !all_digits(integer) || !all_digits(fraction) {
            return Err(UnitsError::Malformed(amount.to_string()));
        }

        Ok(Self { integer, fraction })
    }

    /// True when every digit is zero.
    pub fn is_zero(&self) -> bool {
        self.integer.bytes().chain(self.fraction.bytes()).all(|b| b == b'0')
    }

    /// Scale into smallest units without rounding.
    pub fn scale(&self, decimals: u8) -> Result<U256, UnitsError> {
        let allowed = decimals as usize;
        if self.fraction.len() > allowed {
            return Err(UnitsError::TooManyDecimals {
                found: self.fraction.len(),
                allowed: decimals,
            });
        }

        let padding = "0".repeat(allowed - self.fraction.len());
        let digits = format!("{}{}{}", self.integer, self.fraction, padding);
        let digits = digits.trim_start_matches('0');

        if digits.is_empty() {
            return Ok(U256::ZERO);
        }

        digits.parse::<U256>().map_err(|_| UnitsError::Overflow)
    }
}

/// Format a U256 value with decimals to a human-readable string.
pub fn format_units(value: U256, decimals: u8) -> String {
    if value == U256::ZERO {
        return "0".to_string();
    }

    let value_str = value.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return value_str;
    }

    let len = value_str.len();
    if len <= decimals {
        let zeros = decimals - len;
        let decimal_part = value_str.trim_end_matches('0');
        format!("0.{}{}", "0".repeat(zeros), decimal_part)
    } else {
        let (integer, decimal) = value_str.split_at(len - decimals);
        let decimal = decimal.trim_end_matches('0');
        if decimal.is_empty() {
            integer.to_string()
        } else {
            format!("{}.{}", integer, decimal)
        }
    }
}

/// Parse a human-readable amount string to smallest units.
///
/// Unlike a lenient parser this never truncates: more fractional digits
/// than `decimals` is an error.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    Numeral::parse(amount)?.scale(decimals)
}

/// Convert U256 to Decimal with proper scaling.
///
/// Returns `None` when the value exceeds Decimal's 96-bit mantissa.
pub fn u256_to_decimal(value: U256, decimals: u8) -> Option<Decimal> {
    format_units(value, decimals).parse::<Decimal>().ok()
}

/// Parse an address the way a strict EIP-55 validator does.
///
/// All-lowercase and all-uppercase hex are accepted as-is; mixed case must
/// match the checksum.
pub fn parse_address(s: &str) -> Result<Address, String> {
    let trimmed = s.trim();

    let Some(hex) = trimmed.strip_prefix("0x") else {
        return Err(format!("Address must start with '0x': {}", s));
    };

    if hex.len() != 40 {
        return Err(format!("Address must be 0x + 40 hex chars, got {}: {}", trimmed.len(), s));
    }

    let address = trimmed
        .parse::<Address>()
        .map_err(|e| format!("Invalid address format '{}': {}", s, e))?;

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != trimmed {
        return Err(format!("Address checksum mismatch: {}", s));
    }

    Ok(address)
}

/// `0x1234...abcd` form for compact display of an account.
pub fn shorten_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
