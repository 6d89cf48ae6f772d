//! Core types for the token ledger
//!
//! All types are designed for:
//! - Exact arithmetic (`u128` amounts, checked operations)
//! - Serde serialization of events and receipts
//! - Memory safety (no unsafe code)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account or contract address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create new address
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// The null account. Transfers targeting it are rejected; mint and burn
    /// events use it as their synthetic counterparty.
    pub fn zero() -> Self {
        Self("0x0".to_string())
    }

    /// Whether this is the null account
    pub fn is_zero(&self) -> bool {
        self.0 == "0x0"
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ledger event record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEvent {
    /// Unique event ID (UUIDv7 for time-ordering)
    pub event_id: Uuid,

    /// Event timestamp
    pub at: DateTime<Utc>,

    /// What happened
    pub kind: TokenEventKind,
}

impl TokenEvent {
    /// Create a new event record stamped now
    pub fn now(kind: TokenEventKind) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            at: Utc::now(),
            kind,
        }
    }
}

/// Ledger event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEventKind {
    /// Balance movement. Mints use the zero address as `from`, burns as `to`.
    Transfer {
        /// Debited account
        from: Address,
        /// Credited account
        to: Address,
        /// Amount moved
        value: u128,
    },
    /// Auxiliary payload attached to a notifying transfer
    TransferData {
        /// Opaque payload handed to the recipient hook
        data: Vec<u8>,
    },
    /// Allowance set to an exact value
    Approval {
        /// Funds owner
        owner: Address,
        /// Approved spender
        spender: Address,
        /// New allowance
        value: u128,
    },
}
