//! tvault ERC-4626 Vault
//!
//! Tokenized vault over a single underlying asset. Depositors hand assets
//! to the vault and receive shares; shares are redeemable for a
//! proportional cut of everything the vault holds.
//!
//! ## Accounting
//!
//! - `total_assets` is always read from the asset ledger (the vault's own
//!   balance there), never cached
//! - `total_supply` of shares equals the sum of all share balances
//! - Rounding always favors the vault: deposit and redeem round down,
//!   mint and withdraw round up
//!
//! ## Atomicity
//!
//! Every operation validates its whole effect first, then performs the
//! single fallible asset movement, then applies share-ledger changes that
//! were already proven to succeed. An `Err` therefore leaves both the vault
//! and the asset ledger exactly as they were.

#![cfg_attr(not(feature = "std"), no_std)]

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tvault_common::{
    constants::limits::{MAX_DEPOSIT, MAX_MINT},
    errors::{AmountErrorReason, VaultError, VaultResult},
    events::{EventLog, VaultEvent},
    ledger::FungibleLedger,
    math::{convert_to_assets, convert_to_shares, Rounding},
    types::{is_zero_address, Address, VaultAction, VaultConfig},
    AssetLedger, String, WideUint,
};


// ============ Call Context ============

/// Per-call execution context supplied by the host
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Identity issuing the call
    pub caller: Address,
    /// Events emitted by the vault (share ledger and vault events)
    pub events: EventLog,
    /// Events emitted by the asset ledger while serving this call
    pub asset_events: EventLog,
}

impl CallContext {
    /// Fresh context for `caller`
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            events: EventLog::new(),
            asset_events: EventLog::new(),
        }
    }
}

/// Return value of a dispatched [`VaultAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultOutcome {
    /// Shares minted (deposit) or burned (withdraw)
    Shares(WideUint),
    /// Assets pulled (mint) or paid out (redeem)
    Assets(WideUint),
    /// Share-token operations report success as a flag
    Success(bool),
}

// ============ Vault State ============

/// Vault state: immutable metadata plus the share ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Vault {
    /// Identity of the vault; holds the underlying assets
    address: Address,
    /// Identity of the underlying asset ledger
    asset: Address,
    name: String,
    symbol: String,
    decimals: u8,
    shares: FungibleLedger,
}

impl Vault {
    /// Deploy a vault at `address` over `asset`.
    ///
    /// Share decimals follow the asset's decimals.
    pub fn deploy<A: AssetLedger>(address: Address, config: VaultConfig, asset: &A) -> VaultResult<Self> {
        if is_zero_address(&address) {
            return Err(VaultError::InvalidAddress {
                reason: "vault deployed at zero address",
            });
        }
        if is_zero_address(&asset.address()) {
            return Err(VaultError::InvalidAddress {
                reason: "asset at zero address",
            });
        }

        let vault = Self {
            address,
            asset: asset.address(),
            name: config.name,
            symbol: config.symbol,
            decimals: asset.decimals(),
            shares: FungibleLedger::new(),
        };
        debug!(symbol = %vault.symbol, decimals = vault.decimals, "vault deployed");
        Ok(vault)
    }

    // ============ Metadata ============

    /// Share token name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Share token symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Share token decimals
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Underlying asset identity
    pub fn asset(&self) -> Address {
        self.asset
    }

    /// Vault identity
    pub fn address(&self) -> Address {
        self.address
    }

    // ============ Share Token Reads ============

    /// Total shares outstanding
    pub fn total_supply(&self) -> WideUint {
        self.shares.total_supply()
    }

    /// Shares held by `owner`
    pub fn balance_of(&self, owner: &Address) -> WideUint {
        self.shares.balance_of(owner)
    }

    /// Shares `spender` may still move or redeem for `owner`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> WideUint {
        self.shares.allowance(owner, spender)
    }

    /// Read-only view of the share ledger
    pub fn share_ledger(&self) -> &FungibleLedger {
        &self.shares
    }

    // ============ Accounting Reads ============

    /// Underlying assets held by the vault
    pub fn total_assets<A: AssetLedger>(&self, asset: &A) -> VaultResult<WideUint> {
        self.ensure_asset(asset)?;
        Ok(asset.balance_of(&self.address))
    }

    /// Shares `assets` is worth at the current rate (floor)
    pub fn convert_to_shares<A: AssetLedger>(&self, asset: &A, assets: WideUint) -> VaultResult<WideUint> {
        self.to_shares(asset, assets, Rounding::Down)
    }

    /// Assets `shares` is worth at the current rate (floor)
    pub fn convert_to_assets<A: AssetLedger>(&self, asset: &A, shares: WideUint) -> VaultResult<WideUint> {
        self.to_assets(asset, shares, Rounding::Down)
    }

    /// Shares a `deposit(assets)` would mint
    pub fn preview_deposit<A: AssetLedger>(&self, asset: &A, assets: WideUint) -> VaultResult<WideUint> {
        self.to_shares(asset, assets, Rounding::Down)
    }

    /// Assets a `mint(shares)` would pull
    pub fn preview_mint<A: AssetLedger>(&self, asset: &A, shares: WideUint) -> VaultResult<WideUint> {
        self.to_assets(asset, shares, Rounding::Up)
    }

    /// Shares a `withdraw(assets)` would burn
    pub fn preview_withdraw<A: AssetLedger>(&self, asset: &A, assets: WideUint) -> VaultResult<WideUint> {
        self.to_shares(asset, assets, Rounding::Up)
    }

    /// Assets a `redeem(shares)` would pay
    pub fn preview_redeem<A: AssetLedger>(&self, asset: &A, shares: WideUint) -> VaultResult<WideUint> {
        self.to_assets(asset, shares, Rounding::Down)
    }

    /// Deposit cap for `receiver`; no cap is enforced
    pub fn max_deposit(&self, _receiver: &Address) -> WideUint {
        MAX_DEPOSIT
    }

    /// Mint cap for `receiver`; no cap is enforced
    pub fn max_mint(&self, _receiver: &Address) -> WideUint {
        MAX_MINT
    }

    /// Assets `owner` can withdraw: the full convertible balance
    pub fn max_withdraw<A: AssetLedger>(&self, asset: &A, owner: &Address) -> VaultResult<WideUint> {
        self.convert_to_assets(asset, self.balance_of(owner))
    }

    /// Shares `owner` can redeem: the full balance
    pub fn max_redeem(&self, owner: &Address) -> WideUint {
        self.balance_of(owner)
    }

    // ============ Deposit Flows ============

    /// Deposit exactly `assets`, minting shares to `receiver`.
    ///
    /// The caller must have approved the vault on the asset ledger.
    ///
    /// # Errors
    ///
    /// `InsufficientAllowance` / `InsufficientBalance` if the asset pull
    /// fails, `InvalidAmount` if a non-zero deposit would mint no shares.
    pub fn deposit<A: AssetLedger>(
        &mut self,
        asset: &mut A,
        ctx: &mut CallContext,
        assets: WideUint,
        receiver: Address,
    ) -> VaultResult<WideUint> {
        let shares = self.preview_deposit(asset, assets)?;
        if !assets.is_zero() && shares.is_zero() {
            return Err(VaultError::InvalidAmount {
                amount: assets,
                reason: AmountErrorReason::ZeroShares,
            });
        }

        self.enter(asset, ctx, &receiver, assets, shares)?;
        debug!(assets = %assets, shares = %shares, "deposit");
        Ok(shares)
    }

    /// Mint exactly `shares` to `receiver`, pulling the required assets
    /// (rounded up) from the caller.
    ///
    /// # Errors
    ///
    /// `InsufficientAllowance` / `InsufficientBalance` if the asset pull
    /// fails, `Overflow` if the share supply would exceed 256 bits.
    pub fn mint<A: AssetLedger>(
        &mut self,
        asset: &mut A,
        ctx: &mut CallContext,
        shares: WideUint,
        receiver: Address,
    ) -> VaultResult<WideUint> {
        let assets = self.preview_mint(asset, shares)?;

        self.enter(asset, ctx, &receiver, assets, shares)?;
        debug!(assets = %assets, shares = %shares, "mint");
        Ok(assets)
    }

    // ============ Withdrawal Flows ============

    /// Withdraw exactly `assets` to `receiver`, burning the required
    /// shares (rounded up) from `owner`.
    ///
    /// # Errors
    ///
    /// `InsufficientAllowance` if the caller is not `owner` and lacks
    /// allowance for the burned shares, `InsufficientBalance` if `owner`
    /// holds too few shares.
    pub fn withdraw<A: AssetLedger>(
        &mut self,
        asset: &mut A,
        ctx: &mut CallContext,
        assets: WideUint,
        receiver: Address,
        owner: Address,
    ) -> VaultResult<WideUint> {
        let shares = self.preview_withdraw(asset, assets)?;

        self.exit(asset, ctx, &receiver, &owner, assets, shares)?;
        debug!(assets = %assets, shares = %shares, "withdraw");
        Ok(shares)
    }

    /// Redeem exactly `shares` from `owner`, paying the assets they are
    /// worth (rounded down) to `receiver`.
    ///
    /// # Errors
    ///
    /// Same authorization and balance failures as [`withdraw`](Self::withdraw);
    /// `InvalidAmount` if non-zero shares would pay out nothing.
    pub fn redeem<A: AssetLedger>(
        &mut self,
        asset: &mut A,
        ctx: &mut CallContext,
        shares: WideUint,
        receiver: Address,
        owner: Address,
    ) -> VaultResult<WideUint> {
        let assets = self.preview_redeem(asset, shares)?;
        if !shares.is_zero() && assets.is_zero() {
            return Err(VaultError::InvalidAmount {
                amount: shares,
                reason: AmountErrorReason::ZeroAssets,
            });
        }

        self.exit(asset, ctx, &receiver, &owner, assets, shares)?;
        debug!(assets = %assets, shares = %shares, "redeem");
        Ok(assets)
    }

    // ============ Share Token Operations ============

    /// Set `spender`'s allowance over the caller's shares
    pub fn approve(&mut self, ctx: &mut CallContext, spender: Address, amount: WideUint) -> VaultResult<bool> {
        self.shares.approve(&ctx.caller, &spender, amount, &mut ctx.events)?;
        Ok(true)
    }

    /// Raise `spender`'s allowance over the caller's shares
    pub fn increase_allowance(
        &mut self,
        ctx: &mut CallContext,
        spender: Address,
        added: WideUint,
    ) -> VaultResult<bool> {
        self.shares
            .increase_allowance(&ctx.caller, &spender, added, &mut ctx.events)?;
        Ok(true)
    }

    /// Lower `spender`'s allowance over the caller's shares
    pub fn decrease_allowance(
        &mut self,
        ctx: &mut CallContext,
        spender: Address,
        subtracted: WideUint,
    ) -> VaultResult<bool> {
        self.shares
            .decrease_allowance(&ctx.caller, &spender, subtracted, &mut ctx.events)?;
        Ok(true)
    }

    /// Move the caller's shares to `to`
    pub fn transfer(&mut self, ctx: &mut CallContext, to: Address, amount: WideUint) -> VaultResult<bool> {
        self.shares.transfer(&ctx.caller, &to, amount, &mut ctx.events)?;
        Ok(true)
    }

    /// Move `from`'s shares to `to` using the caller's allowance
    pub fn transfer_from(
        &mut self,
        ctx: &mut CallContext,
        from: Address,
        to: Address,
        amount: WideUint,
    ) -> VaultResult<bool> {
        self.shares
            .transfer_from(&ctx.caller, &from, &to, amount, &mut ctx.events)?;
        Ok(true)
    }

    // ============ Dispatch ============

    /// Main entry point for vault operations
    pub fn execute<A: AssetLedger>(
        &mut self,
        asset: &mut A,
        ctx: &mut CallContext,
        action: &VaultAction,
    ) -> VaultResult<VaultOutcome> {
        let result = match action {
            VaultAction::Deposit { assets, receiver } => self
                .deposit(asset, ctx, *assets, *receiver)
                .map(VaultOutcome::Shares),
            VaultAction::Mint { shares, receiver } => self
                .mint(asset, ctx, *shares, *receiver)
                .map(VaultOutcome::Assets),
            VaultAction::Withdraw {
                assets,
                receiver,
                owner,
            } => self
                .withdraw(asset, ctx, *assets, *receiver, *owner)
                .map(VaultOutcome::Shares),
            VaultAction::Redeem {
                shares,
                receiver,
                owner,
            } => self
                .redeem(asset, ctx, *shares, *receiver, *owner)
                .map(VaultOutcome::Assets),
            VaultAction::Approve { spender, amount } => self
                .approve(ctx, *spender, *amount)
                .map(VaultOutcome::Success),
            VaultAction::IncreaseAllowance { spender, added } => self
                .increase_allowance(ctx, *spender, *added)
                .map(VaultOutcome::Success),
            VaultAction::DecreaseAllowance {
                spender,
                subtracted,
            } => self
                .decrease_allowance(ctx, *spender, *subtracted)
                .map(VaultOutcome::Success),
            VaultAction::Transfer { to, amount } => self
                .transfer(ctx, *to, *amount)
                .map(VaultOutcome::Success),
            VaultAction::TransferFrom { from, to, amount } => self
                .transfer_from(ctx, *from, *to, *amount)
                .map(VaultOutcome::Success),
        };

        if let Err(ref err) = result {
            warn!(code = err.code(), symbol = %self.symbol, "vault action rejected");
        }
        result
    }

    // ============ Internals ============

    fn ensure_asset<A: AssetLedger>(&self, asset: &A) -> VaultResult<()> {
        if asset.address() != self.asset {
            return Err(VaultError::InvalidAddress {
                reason: "asset ledger does not match vault asset",
            });
        }
        Ok(())
    }

    fn to_shares<A: AssetLedger>(&self, asset: &A, assets: WideUint, rounding: Rounding) -> VaultResult<WideUint> {
        let total_assets = self.total_assets(asset)?;
        convert_to_shares(assets, total_assets, self.total_supply(), rounding)
    }

    fn to_assets<A: AssetLedger>(&self, asset: &A, shares: WideUint, rounding: Rounding) -> VaultResult<WideUint> {
        let total_assets = self.total_assets(asset)?;
        convert_to_assets(shares, total_assets, self.total_supply(), rounding)
    }

    /// Pull `assets` from the caller and mint `shares` to `receiver`
    fn enter<A: AssetLedger>(
        &mut self,
        asset: &mut A,
        ctx: &mut CallContext,
        receiver: &Address,
        assets: WideUint,
        shares: WideUint,
    ) -> VaultResult<()> {
        // A pull from the vault into itself moves nothing
        if ctx.caller == self.address {
            return Err(VaultError::InvalidAddress {
                reason: "vault cannot deposit into itself",
            });
        }
        self.shares.ensure_mintable(receiver, shares)?;

        // The only fallible external step; nothing has been written yet
        asset.transfer_from(
            &self.address,
            &ctx.caller,
            &self.address,
            assets,
            &mut ctx.asset_events,
        )?;

        self.shares.mint(receiver, shares, &mut ctx.events)?;
        ctx.events.emit(VaultEvent::Deposit {
            caller: ctx.caller,
            receiver: *receiver,
            assets,
            shares,
        });
        Ok(())
    }

    /// Burn `shares` from `owner` (spending the caller's allowance) and
    /// send `assets` to `receiver`
    fn exit<A: AssetLedger>(
        &mut self,
        asset: &mut A,
        ctx: &mut CallContext,
        receiver: &Address,
        owner: &Address,
        assets: WideUint,
        shares: WideUint,
    ) -> VaultResult<()> {
        if is_zero_address(owner) {
            return Err(VaultError::InvalidAddress {
                reason: "owner is zero address",
            });
        }
        self.shares.ensure_allowance(owner, &ctx.caller, shares)?;
        self.shares.ensure_balance(owner, shares)?;

        asset.transfer(&self.address, receiver, assets, &mut ctx.asset_events)?;

        self.shares.spend_allowance(owner, &ctx.caller, shares)?;
        self.shares.burn(owner, shares, &mut ctx.events)?;
        ctx.events.emit(VaultEvent::Withdraw {
            caller: ctx.caller,
            receiver: *receiver,
            owner: *owner,
            assets,
            shares,
        });
        Ok(())
    }
}
