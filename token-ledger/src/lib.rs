//! GNG Token Ledger
//!
//! Single-asset fungible token ledger with push notification to contract
//! recipients.
//!
//! # Architecture
//!
//! - **Check-then-mutate**: every operation validates its preconditions
//!   before touching state, so a failed call leaves no partial effect
//! - **Notify-on-credit**: `transfer` invokes the recipient's [`CreditHook`]
//!   synchronously, after balances are updated and before the call returns
//! - **Event journal**: every balance or allowance change appends a
//!   [`TokenEvent`] record
//!
//! # Invariants
//!
//! - Money conservation: `total_supply == Σ balances` at every quiescent point
//! - No negative balances: debits fail atomically instead of underflowing
//! - Supply changes only through privileged `mint`/`burn`

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod access;
pub mod error;
pub mod hook;
pub mod ledger;
pub mod types;

// Re-exports
pub use access::{AccessControl, Lifecycle};
pub use error::{Error, Result};
pub use hook::{CreditHook, NoNotify};
pub use ledger::TokenLedger;
pub use types::{Address, TokenEvent, TokenEventKind};
