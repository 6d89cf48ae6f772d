//! Asset bank: native balances plus token ledger instances
//!
//! The bank is the engine's view of everything that holds money: the native
//! currency map and every [`TokenLedger`] the sale touches (the sale token and
//! each registered payment token). It also provides the checkpoint/restore
//! primitive that turns a multi-step settlement into an all-or-nothing call:
//! state is cloned at entry and restored wholesale on any failure.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use token_ledger::{Address, TokenLedger};

/// Native balances and token ledgers addressed by ledger address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetBank {
    native: HashMap<Address, u128>,
    tokens: HashMap<Address, TokenLedger>,
}

/// Snapshot of the bank taken at call entry
#[derive(Debug, Clone)]
pub struct BankCheckpoint(AssetBank);

impl AssetBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Native balance of `account`
    pub fn native_balance(&self, account: &Address) -> u128 {
        self.native.get(account).copied().unwrap_or(0)
    }

    /// Credit native currency out of thin air (test and genesis funding)
    pub fn fund_native(&mut self, account: &Address, amount: u128) -> Result<()> {
        let credited = self
            .native_balance(account)
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow("fund_native"))?;
        self.native.insert(account.clone(), credited);
        Ok(())
    }

    /// Move native currency between accounts
    pub fn native_transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        if from.is_zero() || to.is_zero() {
            return Err(Error::Ledger(token_ledger::Error::ZeroAddress));
        }
        let have = self.native_balance(from);
        if have < amount {
            return Err(Error::InsufficientNativeBalance {
                account: from.clone(),
                have,
                want: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        // Validate the credit before touching either balance.
        let credited = self
            .native_balance(to)
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow("native_transfer"))?;
        let remaining = have - amount;
        if remaining == 0 {
            self.native.remove(from);
        } else {
            self.native.insert(from.clone(), remaining);
        }
        self.native.insert(to.clone(), credited);
        Ok(())
    }

    /// Add a token ledger to the bank, keyed by its own address
    pub fn install_token(&mut self, ledger: TokenLedger) {
        self.tokens.insert(ledger.address().clone(), ledger);
    }

    /// Token ledger at `address`
    pub fn token(&self, address: &Address) -> Result<&TokenLedger> {
        self.tokens
            .get(address)
            .ok_or_else(|| Error::UnknownToken(address.clone()))
    }

    /// Mutable token ledger at `address`
    pub fn token_mut(&mut self, address: &Address) -> Result<&mut TokenLedger> {
        self.tokens
            .get_mut(address)
            .ok_or_else(|| Error::UnknownToken(address.clone()))
    }

    /// Snapshot the whole bank
    pub fn checkpoint(&self) -> BankCheckpoint {
        BankCheckpoint(self.clone())
    }

    /// Restore a snapshot, discarding every mutation since it was taken
    pub fn restore(&mut self, checkpoint: BankCheckpoint) {
        *self = checkpoint.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn test_native_transfer_conserves() {
        let mut bank = AssetBank::new();
        bank.fund_native(&addr("alice"), 100).unwrap();

        bank.native_transfer(&addr("alice"), &addr("bob"), 30).unwrap();
        assert_eq!(bank.native_balance(&addr("alice")), 70);
        assert_eq!(bank.native_balance(&addr("bob")), 30);

        let overdraft = bank.native_transfer(&addr("alice"), &addr("bob"), 71);
        assert!(matches!(
            overdraft,
            Err(Error::InsufficientNativeBalance { have: 70, want: 71, .. })
        ));
    }

    #[test]
    fn test_native_credit_overflow_is_a_typed_error() {
        let mut bank = AssetBank::new();
        bank.fund_native(&addr("vault"), u128::MAX).unwrap();
        bank.fund_native(&addr("alice"), 10).unwrap();

        let result = bank.native_transfer(&addr("alice"), &addr("vault"), 10);
        assert!(matches!(result, Err(Error::ArithmeticOverflow(_))));
        assert_eq!(bank.native_balance(&addr("alice")), 10);
        assert_eq!(bank.native_balance(&addr("vault")), u128::MAX);

        let result = bank.fund_native(&addr("vault"), 1);
        assert!(matches!(result, Err(Error::ArithmeticOverflow(_))));
        assert_eq!(bank.native_balance(&addr("vault")), u128::MAX);
    }

    #[test]
    fn test_checkpoint_restore_discards_mutations() {
        let mut bank = AssetBank::new();
        bank.fund_native(&addr("alice"), 100).unwrap();
        let ledger = TokenLedger::new(addr("tok"), "Tok", "TOK", 18, addr("owner"));
        bank.install_token(ledger);
        bank.token_mut(&addr("tok"))
            .unwrap()
            .mint(&addr("owner"), &addr("alice"), 50)
            .unwrap();

        let checkpoint = bank.checkpoint();

        bank.native_transfer(&addr("alice"), &addr("bob"), 100).unwrap();
        bank.token_mut(&addr("tok"))
            .unwrap()
            .burn(&addr("owner"), &addr("alice"), 50)
            .unwrap();

        bank.restore(checkpoint);
        assert_eq!(bank.native_balance(&addr("alice")), 100);
        assert_eq!(bank.native_balance(&addr("bob")), 0);
        assert_eq!(bank.token(&addr("tok")).unwrap().balance_of(&addr("alice")), 50);
        assert_eq!(bank.token(&addr("tok")).unwrap().total_supply(), 50);
    }

    #[test]
    fn test_unknown_token_is_an_error() {
        let bank = AssetBank::new();
        assert!(matches!(
            bank.token(&addr("nope")),
            Err(Error::UnknownToken(_))
        ));
    }
}
