//! Single-asset balance and allowance bookkeeping
//!
//! The ledger is pure mechanism: it validates preconditions, mutates state,
//! journals events, and notifies recipients through the injected
//! [`CreditHook`]. Privilege decisions live in [`AccessControl`]; reentrancy
//! protection is the caller's responsibility.

use crate::{
    access::AccessControl,
    hook::CreditHook,
    types::{Address, TokenEvent, TokenEventKind},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fungible token ledger with notify-on-credit transfers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLedger {
    /// Address this ledger instance is deployed at
    address: Address,

    /// Token name
    name: String,

    /// Token symbol
    symbol: String,

    /// Display decimals
    decimals: u8,

    /// Account balances; absent entries are zero
    balances: HashMap<Address, u128>,

    /// Allowances keyed by (owner, spender); absent entries are zero
    allowances: HashMap<(Address, Address), u128>,

    /// Total minted supply
    total_supply: u128,

    /// Mint/burn privilege gate
    access: AccessControl,

    /// Event journal
    events: Vec<TokenEvent>,
}

impl TokenLedger {
    /// Create an empty ledger owned by `owner`
    pub fn new(
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        owner: Address,
    ) -> Self {
        Self {
            address,
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
            access: AccessControl::new(owner),
            events: Vec::new(),
        }
    }

    /// Address of this ledger instance
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Token name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Display decimals
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Total minted supply
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Balance of `account` (zero if never credited)
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Allowance of `spender` on `owner`'s funds
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Event journal, oldest first
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Privilege gate for this ledger
    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    /// Mutable privilege gate (ownership transfer, minter management)
    pub fn access_mut(&mut self) -> &mut AccessControl {
        &mut self.access
    }

    /// Transfer with no auxiliary payload
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
        hook: &mut dyn CreditHook,
    ) -> Result<()> {
        self.transfer_with_data(from, to, amount, &[], hook)
    }

    /// Transfer with an auxiliary payload handed to the recipient hook
    ///
    /// Balances are updated first; the hook then runs against the updated
    /// ledger. A hook error undoes the transfer and fails the call.
    pub fn transfer_with_data(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
        data: &[u8],
        hook: &mut dyn CreditHook,
    ) -> Result<()> {
        self.move_balance(from, to, amount)?;
        let journal_mark = self.events.len();
        self.events.push(TokenEvent::now(TokenEventKind::Transfer {
            from: from.clone(),
            to: to.clone(),
            value: amount,
        }));
        if !data.is_empty() {
            self.events.push(TokenEvent::now(TokenEventKind::TransferData {
                data: data.to_vec(),
            }));
        }

        // Notify after mutation: the recipient observes post-transfer state.
        if let Err(e) = hook.on_tokens_received(self, from, to, amount, data) {
            self.events.truncate(journal_mark);
            self.move_balance(to, from, amount)
                .expect("undo of a just-applied transfer cannot fail");
            return Err(e);
        }

        tracing::debug!(token = %self.address, %from, %to, amount, "transfer");
        Ok(())
    }

    /// Allowance-based transfer on behalf of `from`; no recipient notification
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        let key = (from.clone(), spender.clone());
        let allowed = self.allowances.get(&key).copied().unwrap_or(0);
        if allowed < amount {
            return Err(Error::InsufficientAllowance {
                owner: from.clone(),
                spender: spender.clone(),
                have: allowed,
                want: amount,
            });
        }

        self.move_balance(from, to, amount)?;
        self.set_allowance_entry(key, allowed - amount);
        self.events.push(TokenEvent::now(TokenEventKind::Transfer {
            from: from.clone(),
            to: to.clone(),
            value: amount,
        }));

        tracing::debug!(token = %self.address, %spender, %from, %to, amount, "transfer_from");
        Ok(())
    }

    /// Set `spender`'s allowance to exactly `amount` (overwrite, not additive)
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) -> Result<()> {
        if owner.is_zero() || spender.is_zero() {
            return Err(Error::ZeroAddress);
        }
        self.set_allowance_entry((owner.clone(), spender.clone()), amount);
        self.events.push(TokenEvent::now(TokenEventKind::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            value: amount,
        }));
        Ok(())
    }

    /// Additive convenience over [`approve`](Self::approve)
    pub fn increase_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        added: u128,
    ) -> Result<()> {
        let current = self.allowance(owner, spender);
        let next = current
            .checked_add(added)
            .ok_or(Error::ArithmeticOverflow("increase_allowance"))?;
        self.approve(owner, spender, next)
    }

    /// Subtractive convenience over [`approve`](Self::approve); fails on underflow
    pub fn decrease_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        subtracted: u128,
    ) -> Result<()> {
        let current = self.allowance(owner, spender);
        if current < subtracted {
            return Err(Error::InsufficientAllowance {
                owner: owner.clone(),
                spender: spender.clone(),
                have: current,
                want: subtracted,
            });
        }
        self.approve(owner, spender, current - subtracted)
    }

    /// Mint `amount` to `to`. Privileged: owner or minter.
    pub fn mint(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<()> {
        if !self.access.is_minter(caller) {
            return Err(Error::Unauthorized(caller.clone()));
        }
        if to.is_zero() {
            return Err(Error::ZeroAddress);
        }
        let next_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow("mint"))?;
        self.total_supply = next_supply;
        self.credit(to, amount);
        self.events.push(TokenEvent::now(TokenEventKind::Transfer {
            from: Address::zero(),
            to: to.clone(),
            value: amount,
        }));
        tracing::info!(token = %self.address, %to, amount, supply = self.total_supply, "mint");
        Ok(())
    }

    /// Burn `amount` from `from`. Privileged: owner or minter.
    pub fn burn(&mut self, caller: &Address, from: &Address, amount: u128) -> Result<()> {
        if !self.access.is_minter(caller) {
            return Err(Error::Unauthorized(caller.clone()));
        }
        if from.is_zero() {
            return Err(Error::ZeroAddress);
        }
        self.debit(from, amount)?;
        // Supply covers every balance, so this subtraction cannot underflow.
        self.total_supply -= amount;
        self.events.push(TokenEvent::now(TokenEventKind::Transfer {
            from: from.clone(),
            to: Address::zero(),
            value: amount,
        }));
        tracing::info!(token = %self.address, %from, amount, supply = self.total_supply, "burn");
        Ok(())
    }

    /// Debit `from`, credit `to`. Validates before mutating; `from == to` is a
    /// balance-check-only no-op.
    fn move_balance(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        if from.is_zero() || to.is_zero() {
            return Err(Error::ZeroAddress);
        }
        let have = self.balance_of(from);
        if have < amount {
            return Err(Error::InsufficientBalance {
                account: from.clone(),
                have,
                want: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }

    fn debit(&mut self, account: &Address, amount: u128) -> Result<()> {
        let have = self.balance_of(account);
        if have < amount {
            return Err(Error::InsufficientBalance {
                account: account.clone(),
                have,
                want: amount,
            });
        }
        let remaining = have - amount;
        if remaining == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(account.clone(), remaining);
        }
        Ok(())
    }

    fn credit(&mut self, account: &Address, amount: u128) {
        if amount == 0 {
            return;
        }
        let entry = self.balances.entry(account.clone()).or_insert(0);
        // Balance is bounded by total_supply, which is overflow-checked at mint.
        *entry += amount;
    }

    fn set_allowance_entry(&mut self, key: (Address, Address), value: u128) {
        if value == 0 {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::NoNotify;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    fn ledger_with(owner: &str, holders: &[(&str, u128)]) -> TokenLedger {
        let owner = addr(owner);
        let mut ledger = TokenLedger::new(addr("gng-token"), "Gold Nugget", "GNG", 18, owner.clone());
        for (holder, amount) in holders {
            ledger.mint(&owner, &addr(holder), *amount).unwrap();
        }
        ledger
    }

    #[test]
    fn test_transfer_moves_balance_and_conserves() {
        let mut ledger = ledger_with("owner", &[("alice", 1_000)]);
        let supply_before = ledger.total_supply();

        ledger
            .transfer(&addr("alice"), &addr("bob"), 400, &mut NoNotify)
            .unwrap();

        assert_eq!(ledger.balance_of(&addr("alice")), 600);
        assert_eq!(ledger.balance_of(&addr("bob")), 400);
        assert_eq!(ledger.total_supply(), supply_before);
    }

    #[test]
    fn test_transfer_insufficient_balance_is_atomic() {
        let mut ledger = ledger_with("owner", &[("alice", 100)]);
        let events_before = ledger.events().len();

        let result = ledger.transfer(&addr("alice"), &addr("bob"), 101, &mut NoNotify);
        assert!(matches!(
            result,
            Err(Error::InsufficientBalance { have: 100, want: 101, .. })
        ));
        assert_eq!(ledger.balance_of(&addr("alice")), 100);
        assert_eq!(ledger.balance_of(&addr("bob")), 0);
        assert_eq!(ledger.events().len(), events_before);
    }

    #[test]
    fn test_transfer_to_zero_address_fails() {
        let mut ledger = ledger_with("owner", &[("alice", 100)]);
        let result = ledger.transfer(&addr("alice"), &Address::zero(), 10, &mut NoNotify);
        assert!(matches!(result, Err(Error::ZeroAddress)));
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut ledger = ledger_with("owner", &[("alice", 100)]);
        ledger
            .transfer(&addr("alice"), &addr("alice"), 60, &mut NoNotify)
            .unwrap();
        assert_eq!(ledger.balance_of(&addr("alice")), 100);
    }

    #[test]
    fn test_approve_overwrites() {
        let mut ledger = ledger_with("owner", &[("alice", 100)]);
        ledger.approve(&addr("alice"), &addr("spender"), 50).unwrap();
        ledger.approve(&addr("alice"), &addr("spender"), 20).unwrap();
        assert_eq!(ledger.allowance(&addr("alice"), &addr("spender")), 20);
    }

    #[test]
    fn test_increase_decrease_allowance() {
        let mut ledger = ledger_with("owner", &[("alice", 100)]);
        ledger.increase_allowance(&addr("alice"), &addr("s"), 30).unwrap();
        ledger.increase_allowance(&addr("alice"), &addr("s"), 12).unwrap();
        assert_eq!(ledger.allowance(&addr("alice"), &addr("s")), 42);

        ledger.decrease_allowance(&addr("alice"), &addr("s"), 2).unwrap();
        assert_eq!(ledger.allowance(&addr("alice"), &addr("s")), 40);

        let underflow = ledger.decrease_allowance(&addr("alice"), &addr("s"), 41);
        assert!(matches!(underflow, Err(Error::InsufficientAllowance { .. })));
        assert_eq!(ledger.allowance(&addr("alice"), &addr("s")), 40);
    }

    #[test]
    fn test_transfer_from_decrements_allowance_exactly() {
        let mut ledger = ledger_with("owner", &[("alice", 1_000)]);
        ledger.approve(&addr("alice"), &addr("spender"), 500).unwrap();

        ledger
            .transfer_from(&addr("spender"), &addr("alice"), &addr("bob"), 350)
            .unwrap();

        assert_eq!(ledger.allowance(&addr("alice"), &addr("spender")), 150);
        assert_eq!(ledger.balance_of(&addr("bob")), 350);
    }

    #[test]
    fn test_transfer_from_allowance_checked_before_balance() {
        // Alice holds plenty; the allowance is what falls short.
        let mut ledger = ledger_with("owner", &[("alice", 1_000)]);
        ledger.approve(&addr("alice"), &addr("spender"), 10).unwrap();

        let result = ledger.transfer_from(&addr("spender"), &addr("alice"), &addr("bob"), 11);
        assert!(matches!(result, Err(Error::InsufficientAllowance { have: 10, want: 11, .. })));

        // And the converse: allowance covers it, balance does not.
        ledger.approve(&addr("alice"), &addr("spender"), 5_000).unwrap();
        let result = ledger.transfer_from(&addr("spender"), &addr("alice"), &addr("bob"), 2_000);
        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
        assert_eq!(ledger.allowance(&addr("alice"), &addr("spender")), 5_000);
    }

    #[test]
    fn test_mint_requires_privilege() {
        let mut ledger = ledger_with("owner", &[]);
        let result = ledger.mint(&addr("mallory"), &addr("mallory"), 1);
        assert!(matches!(result, Err(Error::Unauthorized(_))));

        ledger
            .access_mut()
            .add_minter(&addr("owner"), addr("mint-bot"))
            .unwrap();
        ledger.mint(&addr("mint-bot"), &addr("alice"), 7).unwrap();
        assert_eq!(ledger.total_supply(), 7);
    }

    #[test]
    fn test_burn_reduces_supply_and_balance() {
        let mut ledger = ledger_with("owner", &[("alice", 100)]);
        ledger.burn(&addr("owner"), &addr("alice"), 40).unwrap();
        assert_eq!(ledger.balance_of(&addr("alice")), 60);
        assert_eq!(ledger.total_supply(), 60);

        let result = ledger.burn(&addr("owner"), &addr("alice"), 61);
        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
        assert_eq!(ledger.total_supply(), 60);
    }

    /// Hook that records the recipient balance it observed mid-callback.
    struct BalanceProbe {
        watched: Address,
        seen: Option<u128>,
    }

    impl CreditHook for BalanceProbe {
        fn on_tokens_received(
            &mut self,
            ledger: &TokenLedger,
            _from: &Address,
            to: &Address,
            _value: u128,
            _data: &[u8],
        ) -> Result<()> {
            if *to == self.watched {
                self.seen = Some(ledger.balance_of(to));
            }
            Ok(())
        }
    }

    #[test]
    fn test_hook_observes_post_transfer_state() {
        let mut ledger = ledger_with("owner", &[("alice", 100)]);
        let mut probe = BalanceProbe {
            watched: addr("vault"),
            seen: None,
        };

        ledger
            .transfer_with_data(&addr("alice"), &addr("vault"), 30, b"deposit", &mut probe)
            .unwrap();

        // The callback ran against the already-credited balance.
        assert_eq!(probe.seen, Some(30));
        assert!(ledger
            .events()
            .iter()
            .any(|e| matches!(&e.kind, TokenEventKind::TransferData { data } if data == b"deposit")));
    }

    /// Hook that rejects every credit.
    struct RejectAll;

    impl CreditHook for RejectAll {
        fn on_tokens_received(
            &mut self,
            _ledger: &TokenLedger,
            _from: &Address,
            _to: &Address,
            _value: u128,
            _data: &[u8],
        ) -> Result<()> {
            Err(Error::RecipientRejected("not accepting deposits".into()))
        }
    }

    #[test]
    fn test_hook_rejection_reverts_transfer() {
        let mut ledger = ledger_with("owner", &[("alice", 100)]);
        let events_before = ledger.events().len();

        let result = ledger.transfer(&addr("alice"), &addr("vault"), 30, &mut RejectAll);
        assert!(matches!(result, Err(Error::RecipientRejected(_))));

        assert_eq!(ledger.balance_of(&addr("alice")), 100);
        assert_eq!(ledger.balance_of(&addr("vault")), 0);
        assert_eq!(ledger.events().len(), events_before);
        assert_eq!(ledger.total_supply(), 100);
    }
}
