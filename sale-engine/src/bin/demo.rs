//! End-to-end sale walkthrough
//!
//! Sets up a sale token, a stable payment token, and the engine; funds the
//! inventory through the push path; then settles one purchase per entry path
//! and prints the receipts as JSON.

use anyhow::Result;
use sale_engine::{
    AssetBank, PaymentKind, SaleConfig, SettlementEngine, StaticPriceOracle,
};
use token_ledger::{Address, NoNotify, TokenLedger};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let owner = Address::new("owner");
    let engine_addr = Address::new("gng-sale");
    let buyer = Address::new("buyer");
    let sale_token = Address::new("gng-token");
    let stable = Address::new("usd-token");

    // Ledgers: the sale token and one stable payment token.
    let mut bank = AssetBank::new();
    let mut gng = TokenLedger::new(sale_token.clone(), "Gold Nugget", "GNG", 18, owner.clone());
    gng.mint(&owner, &owner, 10_000_000)?;
    bank.install_token(gng);

    let mut usd = TokenLedger::new(stable.clone(), "USD Stable", "USDS", 18, owner.clone());
    usd.mint(&owner, &buyer, 5_000_000)?;
    bank.install_token(usd);

    bank.fund_native(&buyer, 2_000_000)?;

    // Native at 2.00 USD, the stable at 1.00 USD, per raw unit.
    let oracle = StaticPriceOracle::new()
        .with_price(PaymentKind::Native, 2_000_000_000_000_000_000)
        .with_price(
            PaymentKind::Token(stable.clone()),
            1_000_000_000_000_000_000,
        );

    let config = SaleConfig {
        sale_token: sale_token.clone(),
        min_purchase: 1,
        // 18-decimal sale token at 0.03 USD.
        price_per_10000: 300,
        ..Default::default()
    };

    let mut engine = SettlementEngine::new(
        engine_addr.clone(),
        owner.clone(),
        config,
        Box::new(oracle),
        bank,
    )?;
    let stable_id = engine.register_payment_asset(&owner, stable.clone(), "USD Stable")?;

    // Inventory funding: the owner pushes sale tokens into the engine.
    engine.deposit_token(&sale_token, &owner, 5_000_000, b"inventory", &mut NoNotify)?;
    println!("inventory: {}", engine.inventory()?);

    // One purchase per entry path.
    let native_receipt = engine.buy_with_native(&buyer, 150, &mut NoNotify)?;
    println!("{}", serde_json::to_string_pretty(&native_receipt)?);

    engine
        .bank_mut()
        .token_mut(&stable)?
        .approve(&buyer, &engine_addr, 1_000)?;
    let pull_receipt = engine.buy_with_token(&buyer, stable_id, 1_000, &mut NoNotify)?;
    println!("{}", serde_json::to_string_pretty(&pull_receipt)?);

    let push_outcome = engine.deposit_token(&stable, &buyer, 2_000, b"buy", &mut NoNotify)?;
    println!("{}", serde_json::to_string_pretty(&push_outcome)?);

    println!("inventory after sales: {}", engine.inventory()?);
    Ok(())
}
