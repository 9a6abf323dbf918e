//! Core Types for the tvault Protocol
//!
//! Identities, action enums and deployment configuration shared by the
//! vault and the asset ledger contracts.

use crate::String;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::uint256::WideUint;

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// The zero address; never a valid owner, receiver or spender
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Derive a deterministic address from a human-readable label.
///
/// Hosts use this to name fixed identities (deployers, test accounts)
/// without managing key material.
pub fn address_from_label(label: &str) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"tvault.address");
    hasher.update(label.as_bytes());
    hasher.finalize().into()
}

/// Returns true for the zero address
pub fn is_zero_address(address: &Address) -> bool {
    *address == ZERO_ADDRESS
}

// ============ Deployment Config ============

/// Vault deployment parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VaultConfig {
    /// Share token name (e.g., "Vault of Winning")
    pub name: String,
    /// Share token symbol (e.g., "vWIN")
    pub symbol: String,
}

/// Asset ledger deployment parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AssetConfig {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Supply minted to `recipient` at deployment
    pub initial_supply: WideUint,
    /// Receives the initial supply
    pub recipient: Address,
    /// Only this address may mint afterwards
    pub owner: Address,
}

// ============ Actions ============

/// Actions for the vault contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum VaultAction {
    /// Deposit exact assets, mint shares to receiver
    Deposit { assets: WideUint, receiver: Address },
    /// Mint exact shares to receiver, pull the required assets
    Mint { shares: WideUint, receiver: Address },
    /// Withdraw exact assets from owner's position
    Withdraw {
        assets: WideUint,
        receiver: Address,
        owner: Address,
    },
    /// Redeem exact shares from owner's position
    Redeem {
        shares: WideUint,
        receiver: Address,
        owner: Address,
    },
    /// Set spender allowance over caller's shares
    Approve { spender: Address, amount: WideUint },
    /// Raise spender allowance
    IncreaseAllowance { spender: Address, added: WideUint },
    /// Lower spender allowance
    DecreaseAllowance {
        spender: Address,
        subtracted: WideUint,
    },
    /// Move caller's shares
    Transfer { to: Address, amount: WideUint },
    /// Move owner's shares using caller's allowance
    TransferFrom {
        from: Address,
        to: Address,
        amount: WideUint,
    },
}

/// Actions for the asset ledger contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum AssetAction {
    /// Move caller's tokens
    Transfer { to: Address, amount: WideUint },
    /// Move owner's tokens using caller's allowance
    TransferFrom {
        from: Address,
        to: Address,
        amount: WideUint,
    },
    /// Set spender allowance
    Approve { spender: Address, amount: WideUint },
    /// Create new tokens (ledger owner only)
    Mint { to: Address, amount: WideUint },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_label_is_deterministic() {
        let a = address_from_label("capo");
        let b = address_from_label("capo");
        let c = address_from_label("maxi");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!is_zero_address(&a));
    }

    #[test]
    fn test_action_borsh_roundtrip() {
        let action = VaultAction::Withdraw {
            assets: WideUint::from(50_000u64),
            receiver: address_from_label("maxi"),
            owner: address_from_label("capo"),
        };
        let bytes = borsh::to_vec(&action).unwrap();
        let restored: VaultAction = borsh::from_slice(&bytes).unwrap();
        assert_eq!(action, restored);
    }
}
