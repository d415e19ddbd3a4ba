//! Ethereum interaction module.
//!
//! Contains the RPC client, the wallet/transport seam, and contract bindings.

pub mod client;
pub mod constants;
pub mod contracts;
pub mod wallet;

pub use client::{EthereumClient, HttpProvider};
pub use wallet::{ContractCall, LocalWallet, WalletTransport};
