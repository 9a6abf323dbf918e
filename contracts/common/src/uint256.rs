//! 256-bit Unsigned Integers
//!
//! [`WideUint`] stores a 256-bit value as a `(low, high)` pair of 128-bit
//! limbs. Every arithmetic operation is checked: results that do not fit
//! return [`VaultError::Overflow`] (or `Underflow` / `DivisionByZero`)
//! instead of wrapping.
//!
//! Division and decimal formatting run on the four-limb [`U256`] from the
//! `uint` crate; the limb pair converts to and from it losslessly.
//!
//! The all-ones value doubles as the "unlimited" sentinel for allowances
//! and deposit caps.

use core::cmp::Ordering;
use core::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use uint::construct_uint;

use crate::errors::{VaultError, VaultResult};

construct_uint! {
    /// Little-endian 4x64-bit unsigned integer backing wide division
    pub struct U256(4);
}

/// 256-bit unsigned integer as two 128-bit limbs
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, BorshSerialize,
    BorshDeserialize,
)]
pub struct WideUint {
    low: u128,
    high: u128,
}

impl WideUint {
    /// Zero
    pub const ZERO: Self = Self { low: 0, high: 0 };

    /// One
    pub const ONE: Self = Self { low: 1, high: 0 };

    /// All ones; the unlimited sentinel
    pub const MAX: Self = Self {
        low: u128::MAX,
        high: u128::MAX,
    };

    /// Build from limbs (`low` holds bits 0..128, `high` bits 128..256)
    pub const fn new(low: u128, high: u128) -> Self {
        Self { low, high }
    }

    /// Build from a single 128-bit value
    pub const fn from_u128(value: u128) -> Self {
        Self {
            low: value,
            high: 0,
        }
    }

    /// The all-ones value
    pub const fn max() -> Self {
        Self::MAX
    }

    /// Low limb
    pub const fn low(&self) -> u128 {
        self.low
    }

    /// High limb
    pub const fn high(&self) -> u128 {
        self.high
    }

    /// True iff both limbs are zero
    pub const fn is_zero(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// True iff this is the unlimited sentinel
    pub const fn is_max(&self) -> bool {
        self.low == u128::MAX && self.high == u128::MAX
    }

    // ============ Checked Arithmetic ============

    /// `self + rhs`, failing with `Overflow` past 2^256 - 1
    pub fn checked_add(self, rhs: Self) -> VaultResult<Self> {
        let (low, carry) = self.low.overflowing_add(rhs.low);
        let high = self
            .high
            .checked_add(rhs.high)
            .and_then(|h| h.checked_add(carry as u128))
            .ok_or(VaultError::Overflow)?;
        Ok(Self { low, high })
    }

    /// `self - rhs`, failing with `Underflow` below zero
    pub fn checked_sub(self, rhs: Self) -> VaultResult<Self> {
        if self < rhs {
            return Err(VaultError::Underflow);
        }
        let (low, borrow) = self.low.overflowing_sub(rhs.low);
        let high = self.high - rhs.high - borrow as u128;
        Ok(Self { low, high })
    }

    /// `self * rhs` over the full 256-bit domain.
    ///
    /// With `a = a1·2^128 + a0` and `b = b1·2^128 + b0` the product is
    /// `a0·b0 + (a1·b0 + a0·b1)·2^128 + a1·b1·2^256`. It fits only if
    /// `a1·b1 == 0`, both cross terms fit in one limb, and adding them to
    /// the carry of `a0·b0` does not overflow the high limb.
    pub fn checked_mul(self, rhs: Self) -> VaultResult<Self> {
        if self.high != 0 && rhs.high != 0 {
            return Err(VaultError::Overflow);
        }

        let Self { low, high: carry } = widening_mul(self.low, rhs.low);
        let cross_a = self
            .high
            .checked_mul(rhs.low)
            .ok_or(VaultError::Overflow)?;
        let cross_b = self
            .low
            .checked_mul(rhs.high)
            .ok_or(VaultError::Overflow)?;

        let high = carry
            .checked_add(cross_a)
            .and_then(|h| h.checked_add(cross_b))
            .ok_or(VaultError::Overflow)?;

        Ok(Self { low, high })
    }

    /// Quotient and remainder of `self / rhs`
    pub fn div_rem(self, rhs: Self) -> VaultResult<(Self, Self)> {
        if rhs.is_zero() {
            return Err(VaultError::DivisionByZero);
        }
        let (quotient, remainder) = U256::from(self).div_mod(U256::from(rhs));
        Ok((quotient.into(), remainder.into()))
    }

    /// Floor division
    pub fn checked_div(self, rhs: Self) -> VaultResult<Self> {
        self.div_rem(rhs).map(|(q, _)| q)
    }

    /// Ceiling division; rounds any remainder up
    pub fn ceil_div(self, rhs: Self) -> VaultResult<Self> {
        let (quotient, remainder) = self.div_rem(rhs)?;
        if remainder.is_zero() {
            Ok(quotient)
        } else {
            quotient.checked_add(Self::ONE)
        }
    }

    /// `floor(self * mul / div)`
    pub fn mul_div_floor(self, mul: Self, div: Self) -> VaultResult<Self> {
        self.checked_mul(mul)?.checked_div(div)
    }

    /// `ceil(self * mul / div)`
    pub fn mul_div_ceil(self, mul: Self, div: Self) -> VaultResult<Self> {
        self.checked_mul(mul)?.ceil_div(div)
    }
}

/// Full 128x128 -> 256 bit product
fn widening_mul(a: u128, b: u128) -> WideUint {
    // 2^128 * 2^128 fits in 256 bits; the overflow flag is always false
    let (product, _) = U256::from(a).overflowing_mul(U256::from(b));
    product.into()
}

impl From<WideUint> for U256 {
    fn from(value: WideUint) -> Self {
        U256([
            value.low as u64,
            (value.low >> 64) as u64,
            value.high as u64,
            (value.high >> 64) as u64,
        ])
    }
}

impl From<U256> for WideUint {
    fn from(value: U256) -> Self {
        let U256(limbs) = value;
        Self {
            low: ((limbs[1] as u128) << 64) | limbs[0] as u128,
            high: ((limbs[3] as u128) << 64) | limbs[2] as u128,
        }
    }
}

impl Ord for WideUint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.high
            .cmp(&other.high)
            .then_with(|| self.low.cmp(&other.low))
    }
}

impl PartialOrd for WideUint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u128> for WideUint {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<u64> for WideUint {
    fn from(value: u64) -> Self {
        Self::from_u128(value as u128)
    }
}

impl From<(u128, u128)> for WideUint {
    fn from((low, high): (u128, u128)) -> Self {
        Self::new(low, high)
    }
}

impl fmt::Display for WideUint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&U256::from(*self), f)
    }
}
