//! Error types for the token ledger

use crate::types::Address;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Operation targets the null account
    #[error("Operation targets the zero address")]
    ZeroAddress,

    /// Debit exceeds the account balance
    #[error("Insufficient balance for {account}: have {have}, want {want}")]
    InsufficientBalance {
        /// Account being debited
        account: Address,
        /// Current balance
        have: u128,
        /// Requested debit
        want: u128,
    },

    /// Spend exceeds the spender's allowance
    #[error("Insufficient allowance for {spender} on {owner}: have {have}, want {want}")]
    InsufficientAllowance {
        /// Funds owner
        owner: Address,
        /// Spender whose allowance fell short
        spender: Address,
        /// Current allowance
        have: u128,
        /// Requested spend
        want: u128,
    },

    /// Checked arithmetic failed
    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// Caller lacks the required privilege
    #[error("Unauthorized caller: {0}")]
    Unauthorized(Address),

    /// Recipient notification hook rejected the credit
    #[error("Recipient rejected transfer: {0}")]
    RecipientRejected(String),
}
