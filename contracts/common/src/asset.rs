//! Underlying Asset Ledger Interface
//!
//! The vault never owns the underlying token's bookkeeping. It reads the
//! ledger and moves funds through this trait, which mirrors the standard
//! fungible-token surface. Implementations must be atomic per call: an
//! `Err` means nothing moved.

use crate::errors::VaultResult;
use crate::events::EventLog;
use crate::types::Address;
use crate::uint256::WideUint;

/// Fungible-token ledger consumed by the vault
pub trait AssetLedger {
    /// Identity of this ledger (the vault's `asset()`)
    fn address(&self) -> Address;

    /// Decimal places of the token
    fn decimals(&self) -> u8;

    /// Balance of `owner`
    fn balance_of(&self, owner: &Address) -> WideUint;

    /// Remaining allowance of `spender` over `owner`
    fn allowance(&self, owner: &Address, spender: &Address) -> WideUint;

    /// Move `amount` from `caller` to `to`
    ///
    /// # Errors
    ///
    /// `InsufficientBalance` if `caller` holds less than `amount`.
    fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()>;

    /// Move `amount` from `from` to `to` using `caller`'s allowance
    ///
    /// # Errors
    ///
    /// `InsufficientAllowance` or `InsufficientBalance` when the pull
    /// cannot be made.
    fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()>;

    /// Set `spender`'s allowance over `caller`'s balance
    fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()>;
}
