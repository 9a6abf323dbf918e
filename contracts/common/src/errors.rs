//! Error Types for the tvault Protocol
//!
//! Every failure aborts the whole transition. Callers get the variant back
//! verbatim; nothing inside the core retries or recovers.

use core::fmt;

use crate::types::Address;
use crate::uint256::WideUint;

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Main error enum for all vault and ledger errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    // ============ Math Errors ============
    /// Arithmetic result exceeds 256 bits
    Overflow,

    /// Subtraction went below zero
    Underflow,

    /// Division by zero
    DivisionByZero,

    // ============ Balance Errors ============
    /// Share or asset balance below the required amount
    InsufficientBalance {
        available: WideUint,
        requested: WideUint,
    },

    /// Spender allowance below the required amount
    InsufficientAllowance {
        available: WideUint,
        requested: WideUint,
    },

    // ============ Input Validation Errors ============
    /// Amount rejected for the given reason
    InvalidAmount {
        amount: WideUint,
        reason: AmountErrorReason,
    },

    /// Invalid address (e.g., zero address)
    InvalidAddress {
        /// Description of why the address is invalid
        reason: &'static str,
    },

    // ============ Authorization Errors ============
    /// Caller is not authorized for this operation
    Unauthorized { expected: Address, actual: Address },
}

/// Reasons for amount-related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountErrorReason {
    /// Non-zero deposit that would mint zero shares
    ZeroShares,
    /// Non-zero redemption that would pay out zero assets
    ZeroAssets,
}

impl VaultError {
    /// Returns a human-readable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "E011_INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance { .. } => "E012_INSUFFICIENT_ALLOWANCE",
            Self::InvalidAmount { .. } => "E010_INVALID_AMOUNT",
            Self::Unauthorized { .. } => "E020_UNAUTHORIZED",
            Self::Overflow => "E080_OVERFLOW",
            Self::Underflow => "E081_UNDERFLOW",
            Self::DivisionByZero => "E082_DIV_ZERO",
            Self::InvalidAddress { .. } => "E090_INVALID_ADDRESS",
        }
    }

    /// Returns true if this error is recoverable (user can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InsufficientBalance { .. } => true,   // Get more funds
            Self::InsufficientAllowance { .. } => true, // Ask the owner to approve
            Self::InvalidAmount { .. } => true,         // Increase amount
            _ => false,
        }
    }
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientBalance { available, requested } => write!(
                f,
                "{}: available {}, requested {}",
                self.code(),
                available,
                requested
            ),
            Self::InsufficientAllowance { available, requested } => write!(
                f,
                "{}: allowance {}, requested {}",
                self.code(),
                available,
                requested
            ),
            Self::InvalidAmount { amount, reason } => {
                write!(f, "{}: {} ({:?})", self.code(), amount, reason)
            }
            Self::InvalidAddress { reason } => write!(f, "{}: {}", self.code(), reason),
            _ => f.write_str(self.code()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VaultError {}
