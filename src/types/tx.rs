//! Transaction lifecycle state.
//!
//! ```text
//! Idle --begin--> Pending(Approve) --advance--> Pending(Swap) --succeed--> Success(hash)
//!                        |                             |
//!                        +--fail--> Error(msg)         +--fail--> Error(msg)
//! Success | Error --begin (reset)--> Idle --> Pending(..)
//! ```
//!
//! Only the swap orchestrator calls the transition methods; everyone else
//! reads [`TxStatus`] snapshots.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};

/// Which on-chain call a pending state is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Approve,
    Swap,
}

/// The user action that drives the current lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxAction {
    /// Allowance approval alone.
    ApproveOnly,
    /// Approval followed by the swap call.
    ApproveAndSwap,
    /// Swap call alone, relying on an existing allowance.
    SwapOnly,
}

impl TxAction {
    /// The call each action starts with.
    pub fn first_call(self) -> TxKind {
        match self {
            TxAction::ApproveOnly | TxAction::ApproveAndSwap => TxKind::Approve,
            TxAction::SwapOnly => TxKind::Swap,
        }
    }
}

/// Current phase of the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TxState {
    #[default]
    Idle,
    Pending(TxKind),
    Success(TxHash),
    Error(String),
}

impl TxState {
    pub fn is_pending(&self) -> bool {
        matches!(self, TxState::Pending(_))
    }

    fn phase(&self) -> &'static str {
        match self {
            TxState::Idle => "idle",
            TxState::Pending(_) => "pending",
            TxState::Success(_) => "success",
            TxState::Error(_) => "error",
        }
    }
}

/// Read-only projection of the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxStatus {
    state: TxState,
    action: Option<TxAction>,
    last_tx_hash: Option<TxHash>,
    last_error: Option<String>,
}

impl TxStatus {
    pub fn state(&self) -> &TxState {
        &self.state
    }

    pub fn action(&self) -> Option<TxAction> {
        self.action
    }

    /// Most recent identifier submitted during the current action.
    pub fn last_tx_hash(&self) -> Option<TxHash> {
        self.last_tx_hash
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// One-line status text for display.
    pub fn message(&self) -> Option<String> {
        match &self.state {
            TxState::Idle => None,
            TxState::Pending(_) => Some("Transaction pending...".to_string()),
            TxState::Success(_) if self.action == Some(TxAction::ApproveOnly) => {
                Some("Approval submitted successfully.".to_string())
            }
            TxState::Success(_) => Some("Swap submitted successfully.".to_string()),
            TxState::Error(message) => Some(message.clone()),
        }
    }

    /// Reset and enter the first pending phase of `action`.
    ///
    /// Returns false, leaving everything untouched, while a call is pending.
    pub(crate) fn begin(&mut self, action: TxAction) -> bool {
        if self.state.is_pending() {
            return false;
        }
        self.reset();
        self.action = Some(action);
        self.state = TxState::Pending(action.first_call());
        true
    }

    pub(crate) fn reset(&mut self) {
        *self = TxStatus::default();
    }

    /// A non-final call was submitted; wait on `next`.
    pub(crate) fn advance(&mut self, hash: TxHash, next: TxKind) {
        debug_assert!(self.state.is_pending());
        self.last_tx_hash = Some(hash);
        self.state = TxState::Pending(next);
    }

    pub(crate) fn succeed(&mut self, hash: TxHash) {
        self.last_tx_hash = Some(hash);
        self.state = TxState::Success(hash);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.last_error = Some(message.clone());
        self.state = TxState::Error(message);
    }

    pub fn to_view(&self) -> TxStatusView {
        TxStatusView {
            phase: self.state.phase().to_string(),
            pending: match self.state {
                TxState::Pending(kind) => Some(kind),
                _ => None,
            },
            action: self.action,
            tx_hash: match self.state {
                TxState::Success(hash) => Some(hash.to_string()),
                _ => None,
            },
            last_tx_hash: self.last_tx_hash.map(|h| h.to_string()),
            error: self.last_error.clone(),
            message: self.message(),
        }
    }
}

/// A settled action: the final hash and the status as it was at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTx {
    pub tx_hash: TxHash,
    pub status: TxStatus,
}

/// Serializable form of [`TxStatus`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxStatusView {
    /// One of "idle", "pending", "success", "error".
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<TxKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<TxAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
