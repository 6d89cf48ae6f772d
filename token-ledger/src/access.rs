//! Access control collaborator
//!
//! Owner, minter set, and the one-way setup flag. The ledger and the sale
//! engine call the `is_*` predicates as guards; they never embed policy of
//! their own.

use crate::{Address, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Deployment lifecycle of a privileged component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Initial configuration phase; owner may rewire everything
    Setup,
    /// Live; configuration calls that require setup mode are locked out
    Operational,
}

/// Owner + minter bookkeeping with a one-way setup flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
    minters: HashSet<Address>,
    lifecycle: Lifecycle,
}

impl AccessControl {
    /// Create access control with the given owner, in setup mode
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            minters: HashSet::new(),
            lifecycle: Lifecycle::Setup,
        }
    }

    /// Whether `caller` is the owner
    pub fn is_owner(&self, caller: &Address) -> bool {
        *caller == self.owner
    }

    /// Whether `caller` may mint or burn. The owner is implicitly a minter.
    pub fn is_minter(&self, caller: &Address) -> bool {
        self.is_owner(caller) || self.minters.contains(caller)
    }

    /// Whether setup-only configuration calls are still allowed
    pub fn is_setup_mode(&self) -> bool {
        self.lifecycle == Lifecycle::Setup
    }

    /// Current owner
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Hand ownership to `new_owner`. Owner only; the zero address is rejected.
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(Error::ZeroAddress);
        }
        tracing::info!(old = %self.owner, new = %new_owner, "Ownership transferred");
        self.owner = new_owner;
        Ok(())
    }

    /// Grant mint/burn privilege. Owner only.
    pub fn add_minter(&mut self, caller: &Address, minter: Address) -> Result<()> {
        self.require_owner(caller)?;
        if minter.is_zero() {
            return Err(Error::ZeroAddress);
        }
        self.minters.insert(minter);
        Ok(())
    }

    /// Revoke mint/burn privilege. Owner only.
    pub fn remove_minter(&mut self, caller: &Address, minter: &Address) -> Result<()> {
        self.require_owner(caller)?;
        self.minters.remove(minter);
        Ok(())
    }

    /// Leave setup mode. Owner only; irreversible.
    pub fn finish_setup(&mut self, caller: &Address) -> Result<()> {
        self.require_owner(caller)?;
        self.lifecycle = Lifecycle::Operational;
        tracing::info!(owner = %self.owner, "Setup mode disabled");
        Ok(())
    }

    fn require_owner(&self, caller: &Address) -> Result<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized(caller.clone()))
        }
    }
}
