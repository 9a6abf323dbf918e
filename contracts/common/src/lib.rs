//! tvault Common Library
//!
//! Shared types, arithmetic and ledgers for the tvault tokenized vault.
//!
//! ## Modules
//!
//! - **uint256**: 256-bit checked integers as `(low, high)` 128-bit limbs
//! - **math**: share/asset conversion with vault-favoring rounding
//! - **ledger**: fungible balances, supply and spender allowances
//! - **asset**: the interface the vault uses to reach the underlying token
//! - **events**: Deposit / Withdraw / Approval / Transfer with indexable keys
//! - **errors**: the single error enum every operation returns
//!
//! This crate is `no_std` compatible when built without the default
//! `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, string::String, vec::Vec};

pub mod asset;
pub mod constants;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod math;
pub mod types;
pub mod uint256;

// Re-exports for convenience
pub use asset::AssetLedger;
pub use errors::*;
pub use events::*;
pub use ledger::FungibleLedger;
pub use math::{convert_to_assets, convert_to_shares, Rounding};
pub use types::*;
pub use uint256::WideUint;
