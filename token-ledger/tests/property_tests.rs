//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify the critical invariants:
//! - Money conservation: transfers never change the total supply
//! - No negative balances: debits that would underflow fail atomically
//! - Allowance decrement: transfer_from spends exactly what it moved

use proptest::prelude::*;
use token_ledger::{Address, Error, NoNotify, TokenLedger};

fn addr(s: &str) -> Address {
    Address::new(s)
}

/// Strategy for generating plain account names
fn account_strategy() -> impl Strategy<Value = Address> {
    "[a-z]{4,12}".prop_map(Address::new)
}

/// Strategy for generating token amounts
fn amount_strategy() -> impl Strategy<Value = u128> {
    0u128..1_000_000_000_000u128
}

fn funded_ledger(holders: &[(Address, u128)]) -> TokenLedger {
    let owner = addr("owner");
    let mut ledger = TokenLedger::new(addr("gng-token"), "Gold Nugget", "GNG", 18, owner.clone());
    for (holder, amount) in holders {
        if !holder.is_zero() {
            ledger.mint(&owner, holder, *amount).unwrap();
        }
    }
    ledger
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: a transfer conserves the sum of the two balances and the
    /// total supply, whether it succeeds or fails.
    #[test]
    fn prop_transfer_conserves_money(
        from in account_strategy(),
        to in account_strategy(),
        funded in amount_strategy(),
        amount in amount_strategy(),
    ) {
        let mut ledger = funded_ledger(&[(from.clone(), funded)]);

        let from_before = ledger.balance_of(&from);
        let to_before = ledger.balance_of(&to);
        let supply_before = ledger.total_supply();

        let _ = ledger.transfer(&from, &to, amount, &mut NoNotify);

        prop_assert_eq!(ledger.total_supply(), supply_before);
        if from != to {
            prop_assert_eq!(
                ledger.balance_of(&from) + ledger.balance_of(&to),
                from_before + to_before
            );
        } else {
            prop_assert_eq!(ledger.balance_of(&from), from_before);
        }
    }

    /// Property: a transfer exceeding the balance fails and changes nothing.
    #[test]
    fn prop_overdraft_fails_atomically(
        from in account_strategy(),
        to in account_strategy(),
        funded in amount_strategy(),
        excess in 1u128..1_000_000u128,
    ) {
        let mut ledger = funded_ledger(&[(from.clone(), funded)]);
        let events_before = ledger.events().len();

        let result = ledger.transfer(&from, &to, funded + excess, &mut NoNotify);

        prop_assert!(
            matches!(result, Err(Error::InsufficientBalance { .. })),
            "expected InsufficientBalance, got {:?}",
            result
        );
        prop_assert_eq!(ledger.balance_of(&from), funded);
        prop_assert_eq!(ledger.events().len(), events_before);
    }

    /// Property: mint adds to supply, burn subtracts, and the supply always
    /// equals the sum of what was minted minus what was burned.
    #[test]
    fn prop_supply_tracks_mint_and_burn(
        holder in account_strategy(),
        minted in amount_strategy(),
        burned in amount_strategy(),
    ) {
        let owner = addr("owner");
        let mut ledger = funded_ledger(&[(holder.clone(), minted)]);

        let result = ledger.burn(&owner, &holder, burned);
        if burned <= minted {
            prop_assert!(result.is_ok());
            prop_assert_eq!(ledger.total_supply(), minted - burned);
            prop_assert_eq!(ledger.balance_of(&holder), minted - burned);
        } else {
            prop_assert!(
                matches!(result, Err(Error::InsufficientBalance { .. })),
                "expected InsufficientBalance, got {:?}",
                result
            );
            prop_assert_eq!(ledger.total_supply(), minted);
        }
    }

    /// Property: transfer_from reduces the allowance by exactly the amount
    /// moved, and only when it succeeds.
    #[test]
    fn prop_allowance_decrements_exactly(
        owner_acct in account_strategy(),
        spender in account_strategy(),
        to in account_strategy(),
        funded in amount_strategy(),
        approved in amount_strategy(),
        amount in amount_strategy(),
    ) {
        let mut ledger = funded_ledger(&[(owner_acct.clone(), funded)]);
        ledger.approve(&owner_acct, &spender, approved).unwrap();

        let result = ledger.transfer_from(&spender, &owner_acct, &to, amount);

        if amount > approved {
            prop_assert!(
                matches!(result, Err(Error::InsufficientAllowance { .. })),
                "expected InsufficientAllowance, got {:?}",
                result
            );
            prop_assert_eq!(ledger.allowance(&owner_acct, &spender), approved);
        } else if amount > funded {
            prop_assert!(
                matches!(result, Err(Error::InsufficientBalance { .. })),
                "expected InsufficientBalance, got {:?}",
                result
            );
            prop_assert_eq!(ledger.allowance(&owner_acct, &spender), approved);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(ledger.allowance(&owner_acct, &spender), approved - amount);
        }
    }
}
