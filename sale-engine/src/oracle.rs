//! Price oracle interface
//!
//! The engine treats the oracle as an opaque source of 18-decimal fixed-point
//! USD prices. A missing or zero price is "unknown asset" and fails the
//! purchase; the engine never interpolates or caches.

use crate::types::PaymentKind;
use std::collections::HashMap;
use std::fmt;

/// Source of 18-decimal USD prices for payment assets
pub trait PriceOracle: fmt::Debug {
    /// Price of one raw unit of `asset`, 18-decimal fixed point.
    /// `None` means the asset is unknown to the oracle.
    fn get_price(&self, asset: &PaymentKind) -> Option<u128>;
}

/// Static lookup-table oracle
///
/// Prices are plain fixture data set by the operator; there is no feed behind
/// them.
#[derive(Debug, Default, Clone)]
pub struct StaticPriceOracle {
    prices: HashMap<PaymentKind, u128>,
}

impl StaticPriceOracle {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) the price of an asset
    pub fn set_price(&mut self, asset: PaymentKind, price18: u128) {
        self.prices.insert(asset, price18);
    }

    /// Builder-style price entry
    pub fn with_price(mut self, asset: PaymentKind, price18: u128) -> Self {
        self.set_price(asset, price18);
        self
    }
}

impl PriceOracle for StaticPriceOracle {
    fn get_price(&self, asset: &PaymentKind) -> Option<u128> {
        self.prices.get(asset).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_ledger::Address;

    #[test]
    fn test_lookup_and_overwrite() {
        let mut oracle = StaticPriceOracle::new()
            .with_price(PaymentKind::Native, 2_000_000_000_000_000_000);
        assert_eq!(
            oracle.get_price(&PaymentKind::Native),
            Some(2_000_000_000_000_000_000)
        );

        oracle.set_price(PaymentKind::Native, 1);
        assert_eq!(oracle.get_price(&PaymentKind::Native), Some(1));

        let unknown = PaymentKind::Token(Address::new("unlisted"));
        assert_eq!(oracle.get_price(&unknown), None);
    }
}
