//! Core types for the sale engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use token_ledger::Address;
use uuid::Uuid;

/// Identifier of a registered payment asset; id 0 is the native currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u32);

impl AssetId {
    /// Reserved id of the native currency
    pub const NATIVE: AssetId = AssetId(0);
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment asset, as a tagged union rather than a sentinel address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentKind {
    /// The network's native currency
    Native,
    /// A token ledger deployed at the given address
    Token(Address),
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentKind::Native => write!(f, "native"),
            PaymentKind::Token(addr) => write!(f, "token:{}", addr),
        }
    }
}

/// Which entry path settled a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchasePath {
    /// Plain native-currency value transfer
    Native,
    /// Allowance-based pull of a payment token
    Pull,
    /// Push deposit via the recipient notification callback
    Push,
}

/// Outcome of a settled purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Unique receipt ID (UUIDv7 for time-ordering)
    pub purchase_id: Uuid,

    /// Buyer account
    pub buyer: Address,

    /// Asset the buyer paid with
    pub asset: PaymentKind,

    /// Amount the buyer offered
    pub amount_paid: u128,

    /// Amount the engine kept (`amount_paid - refund`)
    pub retained: u128,

    /// Sale tokens paid out
    pub reward: u128,

    /// Excess payment returned to the buyer, in the payment asset
    pub refund: u128,

    /// Entry path that settled the purchase
    pub path: PurchasePath,

    /// Settlement timestamp
    pub settled_at: DateTime<Utc>,
}

/// What a push deposit into the engine turned out to be
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositOutcome {
    /// Sale-token top-up by the owner; no purchase took place
    InventoryFunded {
        /// Sale tokens added to inventory
        amount: u128,
    },
    /// A settled purchase
    Purchase(PurchaseReceipt),
}

/// Engine event record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    /// Unique event ID (UUIDv7 for time-ordering)
    pub event_id: Uuid,

    /// Event timestamp
    pub at: DateTime<Utc>,

    /// What happened
    pub kind: SaleEventKind,
}

impl SaleEvent {
    /// Create a new event record stamped now
    pub fn now(kind: SaleEventKind) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            at: Utc::now(),
            kind,
        }
    }
}

/// Engine event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleEventKind {
    /// A purchase settled; the receipt carries both money movements
    PurchaseSettled(PurchaseReceipt),
    /// The sale-token owner topped up the engine's inventory
    InventoryFunded {
        /// Depositing owner
        from: Address,
        /// Sale tokens added to inventory
        amount: u128,
    },
    /// A payment asset was registered or re-registered
    AssetRegistered {
        /// Assigned id
        id: AssetId,
        /// Token ledger address
        address: Address,
        /// Human-readable name
        display_name: String,
    },
    /// The sale configuration was (re)applied
    SaleConfigured,
    /// Owner withdrew funds held by the engine
    Withdrawal {
        /// Asset withdrawn
        asset: PaymentKind,
        /// Destination account
        to: Address,
        /// Amount withdrawn
        amount: u128,
    },
}
