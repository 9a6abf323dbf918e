//! tvault Asset Token
//!
//! Mintable fungible token used as the underlying asset of a vault
//! deployment. Anyone can hold, transfer and approve; only the configured
//! owner can mint new supply.
//!
//! The vault reaches this ledger exclusively through
//! [`tvault_common::AssetLedger`], so any ledger with the same semantics
//! can replace it.

#![cfg_attr(not(feature = "std"), no_std)]

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tvault_common::{
    errors::{VaultError, VaultResult},
    events::EventLog,
    ledger::FungibleLedger,
    types::{AssetAction, AssetConfig, Address},
    AssetLedger, String, WideUint,
};

// ============ Token State ============

/// Asset token state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AssetToken {
    /// Identity of this deployment
    address: Address,
    name: String,
    symbol: String,
    decimals: u8,
    /// Only address allowed to mint
    owner: Address,
    ledger: FungibleLedger,
}

// NOTE: Default is not implemented; a token without an owner could never
// be minted.

impl AssetToken {
    /// Deploy a token at `address`, minting the initial supply to the
    /// configured recipient
    pub fn deploy(address: Address, config: AssetConfig, events: &mut EventLog) -> VaultResult<Self> {
        let mut token = Self {
            address,
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
            owner: config.owner,
            ledger: FungibleLedger::new(),
        };

        if !config.initial_supply.is_zero() {
            token
                .ledger
                .mint(&config.recipient, config.initial_supply, events)?;
        }

        debug!(
            symbol = %token.symbol,
            decimals = token.decimals,
            initial_supply = %config.initial_supply,
            "asset token deployed"
        );
        Ok(token)
    }

    /// Token name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Minting authority
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Total supply
    pub fn total_supply(&self) -> WideUint {
        self.ledger.total_supply()
    }

    /// Create `amount` new tokens for `to`
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the owner; `Overflow` if supply
    /// would exceed 256 bits.
    pub fn mint(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        if *caller != self.owner {
            return Err(VaultError::Unauthorized {
                expected: self.owner,
                actual: *caller,
            });
        }
        self.ledger.mint(to, amount, events)?;
        debug!(amount = %amount, supply = %self.ledger.total_supply(), "asset minted");
        Ok(())
    }

    /// Main entry point for asset operations
    pub fn execute(
        &mut self,
        caller: &Address,
        action: &AssetAction,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        let result = match action {
            AssetAction::Transfer { to, amount } => {
                AssetLedger::transfer(self, caller, to, *amount, events)
            }
            AssetAction::TransferFrom { from, to, amount } => {
                AssetLedger::transfer_from(self, caller, from, to, *amount, events)
            }
            AssetAction::Approve { spender, amount } => {
                AssetLedger::approve(self, caller, spender, *amount, events)
            }
            AssetAction::Mint { to, amount } => self.mint(caller, to, *amount, events),
        };

        if let Err(ref err) = result {
            warn!(code = err.code(), symbol = %self.symbol, "asset action rejected");
        }
        result
    }
}

impl AssetLedger for AssetToken {
    fn address(&self) -> Address {
        self.address
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn balance_of(&self, owner: &Address) -> WideUint {
        self.ledger.balance_of(owner)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> WideUint {
        self.ledger.allowance(owner, spender)
    }

    fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        self.ledger.transfer(caller, to, amount, events)
    }

    fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        self.ledger.transfer_from(caller, from, to, amount, events)
    }

    fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        self.ledger.approve(caller, spender, amount, events)
    }
}

// ============ Tests ============
