//! Configuration for the sale engine

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use token_ledger::Address;

/// Sale configuration
///
/// Mutated only through [`SettlementEngine::configure_sale`]
/// (owner + setup mode); the purchase paths read it and never write it.
///
/// [`SettlementEngine::configure_sale`]: crate::SettlementEngine::configure_sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Address of the token ledger being sold
    pub sale_token: Address,

    /// First instant at which purchases are accepted
    pub window_start: DateTime<Utc>,

    /// Last instant at which purchases are accepted
    pub window_end: DateTime<Utc>,

    /// Smallest reward a purchase may settle for, in raw sale-token units
    pub min_purchase: u128,

    /// USD value (18-decimal fixed point) of 10 000 raw sale-token units
    pub price_per_10000: u128,
}

impl Default for SaleConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            sale_token: Address::new("gng-token"),
            window_start: now,
            window_end: now + Duration::days(30),
            min_purchase: 1,
            // 18-decimal token at 0.03 USD: 10 000 raw units are worth
            // 0.03 * 10 000 / 1e18 USD, i.e. 300 in 18-decimal fixed point.
            price_per_10000: 300,
        }
    }
}

impl SaleConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SaleConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants the purchase paths rely on
    pub fn validate(&self) -> crate::Result<()> {
        if self.price_per_10000 == 0 {
            return Err(crate::Error::Config(
                "price_per_10000 must be positive".to_string(),
            ));
        }
        if self.window_start >= self.window_end {
            return Err(crate::Error::Config(
                "window_start must precede window_end".to_string(),
            ));
        }
        if self.sale_token.is_zero() {
            return Err(crate::Error::Config(
                "sale_token must not be the zero address".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `at` falls inside the sale window (inclusive on both ends)
    pub fn in_window(&self, at: DateTime<Utc>) -> bool {
        at >= self.window_start && at <= self.window_end
    }
}
