//! Protocol Constants
//!
//! Fixed values shared by the vault and the asset ledger.

/// Limits reported by the vault
pub mod limits {
    use crate::uint256::WideUint;

    /// No deposit cap is enforced
    pub const MAX_DEPOSIT: WideUint = WideUint::MAX;

    /// No mint cap is enforced
    pub const MAX_MINT: WideUint = WideUint::MAX;

    /// Allowance value that is never decremented
    pub const UNLIMITED_ALLOWANCE: WideUint = WideUint::MAX;
}

/// Event key derivation
pub mod events {
    /// Domain prefix hashed in front of every event name
    pub const EVENT_KEY_DOMAIN: &[u8] = b"tvault.event";
}
