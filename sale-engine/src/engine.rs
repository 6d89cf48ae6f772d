//! Purchase settlement engine
//!
//! Orchestrates the sale: validates timing and pricing, converts payments
//! into rewards through the oracle, clamps at inventory, and moves money
//! through the [`AssetBank`].
//!
//! Every entry path runs under the reentrancy guard and inside a bank
//! checkpoint, so a failed purchase consumes no funds and a hostile
//! notification callback cannot start a second settlement mid-flight.

use crate::{
    bank::AssetBank,
    config::SaleConfig,
    guard::ReentrancyGuard,
    oracle::PriceOracle,
    pricing::{self, Quote},
    registry::PaymentAssetRegistry,
    types::{
        AssetId, DepositOutcome, PaymentKind, PurchasePath, PurchaseReceipt, SaleEvent,
        SaleEventKind,
    },
    Error, Result,
};
use chrono::Utc;
use token_ledger::{AccessControl, Address, CreditHook, NoNotify};
use uuid::Uuid;

/// Settlement engine
pub struct SettlementEngine {
    /// Account the engine holds funds under
    address: Address,

    /// Sale parameters
    config: SaleConfig,

    /// Privilege gate
    access: AccessControl,

    /// Accepted payment assets
    registry: PaymentAssetRegistry,

    /// Price source
    oracle: Box<dyn PriceOracle>,

    /// Entry-path latch
    guard: ReentrancyGuard,

    /// Everything that holds money
    bank: AssetBank,

    /// Event journal
    events: Vec<SaleEvent>,
}

impl SettlementEngine {
    /// Create a new engine. The bank must already contain the sale-token
    /// ledger named by the configuration.
    pub fn new(
        address: Address,
        owner: Address,
        config: SaleConfig,
        oracle: Box<dyn PriceOracle>,
        bank: AssetBank,
    ) -> Result<Self> {
        config.validate()?;
        bank.token(&config.sale_token)?;
        Ok(Self {
            address,
            config,
            access: AccessControl::new(owner),
            registry: PaymentAssetRegistry::new(),
            oracle,
            guard: ReentrancyGuard::new(),
            bank,
            events: Vec::new(),
        })
    }

    /// Account the engine holds funds under
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Current sale parameters
    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    /// Privilege gate
    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    /// Mutable privilege gate (ownership transfer, minter management)
    pub fn access_mut(&mut self) -> &mut AccessControl {
        &mut self.access
    }

    /// Accepted payment assets
    pub fn registry(&self) -> &PaymentAssetRegistry {
        &self.registry
    }

    /// Handle to the entry-path latch
    pub fn guard(&self) -> ReentrancyGuard {
        self.guard.clone()
    }

    /// Read access to balances and ledgers
    pub fn bank(&self) -> &AssetBank {
        &self.bank
    }

    /// Mutable bank access, for wiring accounts up outside a settlement
    pub fn bank_mut(&mut self) -> &mut AssetBank {
        &mut self.bank
    }

    /// Event journal, oldest first
    pub fn events(&self) -> &[SaleEvent] {
        &self.events
    }

    /// Sale tokens the engine can still pay out
    pub fn inventory(&self) -> Result<u128> {
        Ok(self
            .bank
            .token(&self.config.sale_token)?
            .balance_of(&self.address))
    }

    // ---- entry paths -----------------------------------------------------

    /// Native-currency purchase: a plain value transfer into the engine
    ///
    /// The sale window is validated after the body runs; the checkpoint
    /// rollback undoes the body when the check fails.
    pub fn buy_with_native(
        &mut self,
        buyer: &Address,
        amount_paid: u128,
        hook: &mut dyn CreditHook,
    ) -> Result<PurchaseReceipt> {
        self.with_rollback(|eng| {
            let _permit = eng.guard.try_enter().ok_or(Error::ReentrantCall)?;
            let engine_addr = eng.address.clone();

            eng.bank.native_transfer(buyer, &engine_addr, amount_paid)?;
            let quote = eng.quote_payment(&PaymentKind::Native, amount_paid)?;
            eng.require_min(quote.reward)?;
            eng.pay_reward(buyer, quote.reward, hook)?;
            if quote.refund > 0 {
                eng.bank.native_transfer(&engine_addr, buyer, quote.refund)?;
            }
            let receipt = eng.settled(
                buyer,
                PaymentKind::Native,
                amount_paid,
                quote,
                PurchasePath::Native,
            )?;
            eng.require_window()?;
            Ok(receipt)
        })
    }

    /// Pull-payment purchase: the buyer pre-approved `amount_to_pay` of a
    /// registered payment token to the engine
    ///
    /// The refund is computed before the pull, so the engine simply takes
    /// `amount_to_pay - refund` and never sends payment tokens back.
    pub fn buy_with_token(
        &mut self,
        buyer: &Address,
        asset_id: AssetId,
        amount_to_pay: u128,
        hook: &mut dyn CreditHook,
    ) -> Result<PurchaseReceipt> {
        self.with_rollback(|eng| {
            let _permit = eng.guard.try_enter().ok_or(Error::ReentrantCall)?;
            eng.require_window()?;

            let kind = eng
                .registry
                .kind_by_id(asset_id)
                .ok_or_else(|| Error::UnregisteredPaymentAsset(asset_id.to_string()))?;
            let token_addr = match &kind {
                PaymentKind::Token(addr) => addr.clone(),
                // Native has its own entry path; id 0 is not pullable.
                PaymentKind::Native => {
                    return Err(Error::UnregisteredPaymentAsset(asset_id.to_string()))
                }
            };

            let quote = eng.quote_payment(&kind, amount_to_pay)?;
            eng.require_min(quote.reward)?;

            let engine_addr = eng.address.clone();
            let take = amount_to_pay
                .checked_sub(quote.refund)
                .ok_or(Error::ArithmeticOverflow("pull amount"))?;
            eng.bank
                .token_mut(&token_addr)?
                .transfer_from(&engine_addr, buyer, &engine_addr, take)?;
            eng.pay_reward(buyer, quote.reward, hook)?;

            eng.settled(buyer, kind, amount_to_pay, quote, PurchasePath::Pull)
        })
    }

    /// Push deposit: a token transfer into the engine that carries the
    /// purchase with it
    ///
    /// The ledger transfer is applied first; the settlement callback then
    /// runs against post-transfer state, and any failure rolls the whole
    /// deposit back, transfer included.
    pub fn deposit_token(
        &mut self,
        token: &Address,
        from: &Address,
        amount: u128,
        data: &[u8],
        hook: &mut dyn CreditHook,
    ) -> Result<DepositOutcome> {
        self.with_rollback(|eng| {
            let engine_addr = eng.address.clone();
            eng.bank.token_mut(token)?.transfer_with_data(
                from,
                &engine_addr,
                amount,
                data,
                &mut NoNotify,
            )?;
            eng.on_tokens_received(token, from, amount, data, hook)
        })
    }

    /// Recipient notification callback: the engine was credited `value` of
    /// `token` by `from`
    ///
    /// Owner deposits of the sale token fund the inventory and skip every
    /// purchase check. Anything else must be a registered payment asset and
    /// settles as a purchase.
    pub fn on_tokens_received(
        &mut self,
        token: &Address,
        from: &Address,
        value: u128,
        _data: &[u8],
        hook: &mut dyn CreditHook,
    ) -> Result<DepositOutcome> {
        self.with_rollback(|eng| {
            let _permit = eng.guard.try_enter().ok_or(Error::ReentrantCall)?;

            if *token == eng.config.sale_token && eng.access.is_owner(from) {
                eng.events.push(SaleEvent::now(SaleEventKind::InventoryFunded {
                    from: from.clone(),
                    amount: value,
                }));
                tracing::info!(%from, amount = value, "Inventory funded");
                return Ok(DepositOutcome::InventoryFunded { amount: value });
            }

            if !eng.registry.is_registered(token) {
                return Err(Error::UnregisteredPaymentAsset(token.to_string()));
            }
            eng.require_window()?;

            let kind = PaymentKind::Token(token.clone());
            let quote = eng.quote_payment(&kind, value)?;
            eng.require_min(quote.reward)?;
            eng.pay_reward(from, quote.reward, hook)?;
            if quote.refund > 0 {
                let engine_addr = eng.address.clone();
                eng.bank
                    .token_mut(token)?
                    .transfer(&engine_addr, from, quote.refund, hook)?;
            }

            let receipt = eng.settled(from, kind, value, quote, PurchasePath::Push)?;
            Ok(DepositOutcome::Purchase(receipt))
        })
    }

    // ---- administrative surface ------------------------------------------

    /// Apply a new sale configuration. Owner only, setup mode only.
    pub fn configure_sale(&mut self, caller: &Address, config: SaleConfig) -> Result<()> {
        self.require_owner(caller)?;
        if !self.access.is_setup_mode() {
            return Err(Error::Config(
                "sale configuration is locked once setup mode ends".to_string(),
            ));
        }
        config.validate()?;
        self.bank.token(&config.sale_token)?;
        self.config = config;
        self.events.push(SaleEvent::now(SaleEventKind::SaleConfigured));
        tracing::info!(
            start = %self.config.window_start,
            end = %self.config.window_end,
            min_purchase = self.config.min_purchase,
            "Sale configured"
        );
        Ok(())
    }

    /// Register (or rename) a payment asset. Owner only.
    pub fn register_payment_asset(
        &mut self,
        caller: &Address,
        address: Address,
        display_name: &str,
    ) -> Result<AssetId> {
        self.require_owner(caller)?;
        if address.is_zero() {
            return Err(Error::Ledger(token_ledger::Error::ZeroAddress));
        }
        self.bank.token(&address)?;
        let id = self.registry.register(address.clone(), display_name);
        self.events.push(SaleEvent::now(SaleEventKind::AssetRegistered {
            id,
            address: address.clone(),
            display_name: display_name.to_string(),
        }));
        tracing::info!(%id, %address, display_name, "Payment asset registered");
        Ok(id)
    }

    /// Leave setup mode. Owner only; irreversible.
    pub fn finish_setup(&mut self, caller: &Address) -> Result<()> {
        self.access.finish_setup(caller)?;
        Ok(())
    }

    /// Withdraw native currency held by the engine. Owner only.
    pub fn withdraw_native(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<()> {
        self.require_owner(caller)?;
        let engine_addr = self.address.clone();
        self.bank.native_transfer(&engine_addr, to, amount)?;
        self.events.push(SaleEvent::now(SaleEventKind::Withdrawal {
            asset: PaymentKind::Native,
            to: to.clone(),
            amount,
        }));
        tracing::info!(%to, amount, "Native withdrawal");
        Ok(())
    }

    /// Withdraw (or rescue) tokens held by the engine, the sale token
    /// included. Owner only.
    pub fn withdraw_tokens(
        &mut self,
        caller: &Address,
        token: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        self.require_owner(caller)?;
        let engine_addr = self.address.clone();
        self.bank
            .token_mut(token)?
            .transfer(&engine_addr, to, amount, &mut NoNotify)?;
        self.events.push(SaleEvent::now(SaleEventKind::Withdrawal {
            asset: PaymentKind::Token(token.clone()),
            to: to.clone(),
            amount,
        }));
        tracing::info!(%token, %to, amount, "Token withdrawal");
        Ok(())
    }

    // ---- internals -------------------------------------------------------

    /// Run `f` against a bank checkpoint; restore it and drop journaled
    /// events if `f` fails.
    fn with_rollback<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.bank.checkpoint();
        let events_mark = self.events.len();
        match f(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                self.bank.restore(checkpoint);
                self.events.truncate(events_mark);
                Err(e)
            }
        }
    }

    /// Price the payment and clamp the reward at current inventory
    fn quote_payment(&self, kind: &PaymentKind, amount_paid: u128) -> Result<Quote> {
        let price18 = self
            .oracle
            .get_price(kind)
            .filter(|p| *p > 0)
            .ok_or_else(|| Error::PriceUnavailable(kind.to_string()))?;
        let inventory = self.inventory()?;
        pricing::quote(price18, amount_paid, self.config.price_per_10000, inventory)
    }

    /// Pay the reward out of inventory
    fn pay_reward(&mut self, buyer: &Address, amount: u128, hook: &mut dyn CreditHook) -> Result<()> {
        let engine_addr = self.address.clone();
        let sale_token = self.config.sale_token.clone();
        self.bank
            .token_mut(&sale_token)?
            .transfer(&engine_addr, buyer, amount, hook)?;
        Ok(())
    }

    /// Journal a settled purchase and build its receipt
    fn settled(
        &mut self,
        buyer: &Address,
        asset: PaymentKind,
        amount_paid: u128,
        quote: Quote,
        path: PurchasePath,
    ) -> Result<PurchaseReceipt> {
        let retained = amount_paid
            .checked_sub(quote.refund)
            .ok_or(Error::ArithmeticOverflow("retained payment"))?;
        let receipt = PurchaseReceipt {
            purchase_id: Uuid::now_v7(),
            buyer: buyer.clone(),
            asset,
            amount_paid,
            retained,
            reward: quote.reward,
            refund: quote.refund,
            path,
            settled_at: Utc::now(),
        };
        self.events
            .push(SaleEvent::now(SaleEventKind::PurchaseSettled(receipt.clone())));
        tracing::info!(
            %buyer,
            asset = %receipt.asset,
            path = ?path,
            paid = amount_paid,
            reward = quote.reward,
            refund = quote.refund,
            "Purchase settled"
        );
        Ok(receipt)
    }

    fn require_window(&self) -> Result<()> {
        let now = Utc::now();
        if self.config.in_window(now) {
            Ok(())
        } else {
            Err(Error::OutOfWindow {
                now,
                start: self.config.window_start,
                end: self.config.window_end,
            })
        }
    }

    fn require_min(&self, reward: u128) -> Result<()> {
        if reward < self.config.min_purchase {
            return Err(Error::BelowMinimumPurchase {
                reward,
                minimum: self.config.min_purchase,
            });
        }
        Ok(())
    }

    fn require_owner(&self, caller: &Address) -> Result<()> {
        if self.access.is_owner(caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized(caller.clone()))
        }
    }
}

impl std::fmt::Debug for SettlementEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementEngine")
            .field("address", &self.address)
            .field("config", &self.config)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}
