//! Recipient notification protocol
//!
//! When a transfer credits a contract-capable account, the ledger informs the
//! recipient synchronously, in the same call stack, before the initiating
//! transfer returns. The hook is injected by the caller: the ledger itself has
//! no registry of which accounts are contracts.
//!
//! Ordering guarantee: the hook runs after the ledger's balances are updated,
//! so a callback that queries the ledger sees post-transfer state. If the hook
//! returns an error, the ledger undoes the transfer and fails the whole call.

use crate::{ledger::TokenLedger, types::Address, Result};

/// Recipient-side notification callback
pub trait CreditHook {
    /// Called once per notifying transfer, after `to` has been credited.
    ///
    /// `ledger` is the post-mutation view of the ledger that moved the funds.
    /// Implementations decide themselves whether `to` is a contract they
    /// manage; for unknown recipients they must return `Ok(())`.
    fn on_tokens_received(
        &mut self,
        ledger: &TokenLedger,
        from: &Address,
        to: &Address,
        value: u128,
        data: &[u8],
    ) -> Result<()>;
}

/// Hook for calls with no contract recipients; accepts every credit
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNotify;

impl CreditHook for NoNotify {
    fn on_tokens_received(
        &mut self,
        _ledger: &TokenLedger,
        _from: &Address,
        _to: &Address,
        _value: u128,
        _data: &[u8],
    ) -> Result<()> {
        Ok(())
    }
}
