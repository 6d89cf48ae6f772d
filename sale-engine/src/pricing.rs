//! Reward and refund arithmetic
//!
//! All conversions are integer floor division over `u128`, applied in a fixed
//! operation order. The order is part of the engine's observable behavior:
//! multiplications run before divisions, and every intermediate result is
//! truncated. Changing the order changes settled amounts.

use crate::{Error, Result};

/// Scale of 18-decimal fixed-point USD prices
pub const USD_SCALE: u128 = 1_000_000_000_000_000_000;

/// Raw sale-token units a `price_per_10000` quote covers
pub const PRICE_LOT: u128 = 10_000;

/// Gross sale-token reward for a payment
///
/// ```text
/// reward = price18 * amount_paid / price_per_10000 * PRICE_LOT / USD_SCALE
/// ```
///
/// `price18` is the 18-decimal USD price of one raw unit of the payment
/// asset; `price_per_10000` is the 18-decimal USD value of [`PRICE_LOT`] raw
/// sale-token units.
pub fn reward_for_payment(price18: u128, amount_paid: u128, price_per_10000: u128) -> Result<u128> {
    let usd = price18
        .checked_mul(amount_paid)
        .ok_or(Error::ArithmeticOverflow("reward_for_payment"))?;
    let lots = usd
        .checked_div(price_per_10000)
        .ok_or(Error::ArithmeticOverflow("reward_for_payment"))?;
    let scaled = lots
        .checked_mul(PRICE_LOT)
        .ok_or(Error::ArithmeticOverflow("reward_for_payment"))?;
    Ok(scaled / USD_SCALE)
}

/// Payment-asset refund for reward that exceeded inventory
///
/// ```text
/// refund = overflow * PRICE_LOT / price_per_10000 / price18
/// ```
///
/// Note this is not the inverse of [`reward_for_payment`]: the reverse
/// conversion applies no [`USD_SCALE`] rescale, and truncates in
/// payment-asset units. The exact output is pinned by tests.
pub fn refund_for_overflow(overflow: u128, price18: u128, price_per_10000: u128) -> Result<u128> {
    let scaled = overflow
        .checked_mul(PRICE_LOT)
        .ok_or(Error::ArithmeticOverflow("refund_for_overflow"))?;
    let lots = scaled
        .checked_div(price_per_10000)
        .ok_or(Error::ArithmeticOverflow("refund_for_overflow"))?;
    lots.checked_div(price18)
        .ok_or(Error::ArithmeticOverflow("refund_for_overflow"))
}

/// Reward and refund for a payment against the available inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Reward before the inventory clamp
    pub gross_reward: u128,
    /// Reward actually paid out
    pub reward: u128,
    /// Payment-asset refund for the clamped portion
    pub refund: u128,
}

/// Quote a payment: compute the gross reward, clamp it at `inventory`, and
/// convert the clamped-off portion back into a payment-asset refund.
pub fn quote(
    price18: u128,
    amount_paid: u128,
    price_per_10000: u128,
    inventory: u128,
) -> Result<Quote> {
    let gross_reward = reward_for_payment(price18, amount_paid, price_per_10000)?;
    if gross_reward > inventory {
        let overflow = gross_reward - inventory;
        Ok(Quote {
            gross_reward,
            reward: inventory,
            refund: refund_for_overflow(overflow, price18, price_per_10000)?,
        })
    } else {
        Ok(Quote {
            gross_reward,
            reward: gross_reward,
            refund: 0,
        })
    }
}
