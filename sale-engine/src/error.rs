//! Error types for the sale engine

use chrono::{DateTime, Utc};
use thiserror::Error;
use token_ledger::Address;

/// Result type for sale-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Sale-engine errors
///
/// Every variant is fatal to the call that raised it: the engine performs no
/// internal recovery, and the caller observes a fully rolled-back state.
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] token_ledger::Error),

    /// A guarded entry point was invoked while the guard was held
    #[error("Reentrant call rejected")]
    ReentrantCall,

    /// Purchase attempted outside the configured sale window
    #[error("Purchase at {now} outside sale window [{start}, {end}]")]
    OutOfWindow {
        /// Time of the attempt
        now: DateTime<Utc>,
        /// Window start
        start: DateTime<Utc>,
        /// Window end
        end: DateTime<Utc>,
    },

    /// Computed reward fell below the configured floor
    #[error("Reward {reward} below minimum purchase {minimum}")]
    BelowMinimumPurchase {
        /// Computed reward
        reward: u128,
        /// Configured floor
        minimum: u128,
    },

    /// Paid or deposited asset is not in the payment-asset registry
    #[error("Unregistered payment asset: {0}")]
    UnregisteredPaymentAsset(String),

    /// Oracle has no price for the asset
    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    /// Caller lacks the required privilege
    #[error("Unauthorized caller: {0}")]
    Unauthorized(Address),

    /// No token ledger is known at the given address
    #[error("Unknown token ledger: {0}")]
    UnknownToken(Address),

    /// Native-currency debit exceeds the account balance
    #[error("Insufficient native balance for {account}: have {have}, want {want}")]
    InsufficientNativeBalance {
        /// Account being debited
        account: Address,
        /// Current balance
        have: u128,
        /// Requested debit
        want: u128,
    },

    /// Checked arithmetic failed
    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
