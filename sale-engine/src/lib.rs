//! GNG Sale Engine
//!
//! Token-sale settlement engine over the [`token_ledger`] crate.
//!
//! # Architecture
//!
//! The engine accepts payment in the native currency or in any registered
//! payment token, prices it through a pluggable oracle, and settles in the
//! sale token:
//!
//! 1. **Quote**: convert the payment into a gross reward at the oracle price
//! 2. **Clamp**: cap the reward at the engine's remaining sale-token inventory
//!    and convert the overflow back into a refund
//! 3. **Settle**: move the payment in, pay the reward out, refund the excess
//!
//! Three entry paths reach the same settlement: a plain native-currency
//! payment, an allowance-based pull of a payment token, and a push deposit
//! delivered through the ledger's recipient notification callback.
//!
//! # Invariants
//!
//! - All-or-nothing calls: every entry path snapshots state and restores it
//!   on any failure; a failed purchase consumes no funds
//! - Reentrancy exclusion: one latch guards all three entry paths, including
//!   self-reentry through the notification callback
//! - Conservation: sale-token outflow equals the reward; payment retained
//!   equals the amount paid minus the refund

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod oracle;
pub mod pricing;
pub mod registry;
pub mod types;

// Re-exports
pub use bank::AssetBank;
pub use config::SaleConfig;
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use guard::{GuardPermit, ReentrancyGuard};
pub use oracle::{PriceOracle, StaticPriceOracle};
pub use registry::PaymentAssetRegistry;
pub use types::{
    AssetId, DepositOutcome, PaymentKind, PurchasePath, PurchaseReceipt, SaleEvent, SaleEventKind,
};
