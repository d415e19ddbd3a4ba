//! Ethereum network constants.
//!
//! Contains chain IDs and the documented test deployment.

// ============================================================================
// Chain IDs
// ============================================================================

/// Sepolia testnet chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Local Hardhat node chain ID.
pub const HARDHAT_CHAIN_ID: u64 = 31337;

/// Default chain ID (Sepolia, where the test deployment lives).
pub const DEFAULT_CHAIN_ID: u64 = SEPOLIA_CHAIN_ID;

// ============================================================================
// Test Deployment (Sepolia)
// ============================================================================

/// TokenSwap contract deployed on Sepolia, used when `TOKEN_SWAP_ADDRESS`
/// is unset.
pub const FALLBACK_TOKEN_SWAP_ADDRESS: &str = "0xB80609D89eFE4b3e1A0Ab91d6c16BB520B762256";

/// Scale of both test stablecoins.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;
