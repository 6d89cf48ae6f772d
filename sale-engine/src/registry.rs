//! Payment-asset registry
//!
//! Maps asset ids to token ledger addresses and back. Id 0 is permanently the
//! native currency and never appears in the address index; registration
//! overwrites, entries are never removed.

use crate::types::{AssetId, PaymentKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use token_ledger::Address;

/// A registered payment asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAssetInfo {
    /// Token ledger address
    pub address: Address,
    /// Human-readable name
    pub display_name: String,
}

/// Registry of assets the sale accepts as payment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentAssetRegistry {
    assets: HashMap<AssetId, PaymentAssetInfo>,
    index: HashMap<Address, AssetId>,
    next_id: u32,
}

impl PaymentAssetRegistry {
    /// Create an empty registry; id 0 (native) is implicitly present
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a token as a payment asset, or overwrite its display name if
    /// the address is already registered. Returns the asset id.
    pub fn register(&mut self, address: Address, display_name: impl Into<String>) -> AssetId {
        let id = match self.index.get(&address) {
            Some(existing) => *existing,
            None => {
                let id = AssetId(self.next_id);
                self.next_id += 1;
                self.index.insert(address.clone(), id);
                id
            }
        };
        self.assets.insert(
            id,
            PaymentAssetInfo {
                address,
                display_name: display_name.into(),
            },
        );
        id
    }

    /// Resolve an asset id to a payment kind; id 0 is native
    pub fn kind_by_id(&self, id: AssetId) -> Option<PaymentKind> {
        if id == AssetId::NATIVE {
            return Some(PaymentKind::Native);
        }
        self.assets
            .get(&id)
            .map(|info| PaymentKind::Token(info.address.clone()))
    }

    /// Resolve a token address to its asset id, if registered
    pub fn id_by_address(&self, address: &Address) -> Option<AssetId> {
        self.index.get(address).copied()
    }

    /// Whether a token address is registered as a payment asset
    pub fn is_registered(&self, address: &Address) -> bool {
        self.index.contains_key(address)
    }

    /// Registered asset info by id (native has no entry)
    pub fn info(&self, id: AssetId) -> Option<&PaymentAssetInfo> {
        self.assets.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = PaymentAssetRegistry::new();
        let usd = registry.register(Address::new("usd-token"), "USD Stable");
        let eth = registry.register(Address::new("weth"), "Wrapped ETH");
        assert_eq!(usd, AssetId(1));
        assert_eq!(eth, AssetId(2));
    }

    #[test]
    fn test_reregistration_overwrites_in_place() {
        let mut registry = PaymentAssetRegistry::new();
        let first = registry.register(Address::new("usd-token"), "USD Stable");
        let second = registry.register(Address::new("usd-token"), "USD Stable v2");

        assert_eq!(first, second);
        assert_eq!(registry.info(first).unwrap().display_name, "USD Stable v2");
        // Index stays the exact inverse of the asset table.
        assert_eq!(registry.id_by_address(&Address::new("usd-token")), Some(first));
    }

    #[test]
    fn test_native_is_id_zero_and_unindexed() {
        let registry = PaymentAssetRegistry::new();
        assert_eq!(registry.kind_by_id(AssetId::NATIVE), Some(PaymentKind::Native));
        assert!(registry.info(AssetId::NATIVE).is_none());
        assert_eq!(registry.kind_by_id(AssetId(7)), None);
    }
}
