//! Share/Asset Conversion Math
//!
//! Pure conversion formulas between underlying assets and vault shares.
//!
//! ## Rounding Rules (always favor the vault)
//!
//! | Operation | Convert         | Rounding | Reason                         |
//! |-----------|-----------------|----------|--------------------------------|
//! | Deposit   | assets → shares | DOWN     | Depositor gets fewer shares    |
//! | Mint      | shares → assets | UP       | Minter pays more assets        |
//! | Withdraw  | assets → shares | UP       | Owner burns more shares        |
//! | Redeem    | shares → assets | DOWN     | Owner receives fewer assets    |
//!
//! An empty pool (`total_shares == 0`) converts 1:1 in both directions so
//! the first depositor seeds the rate without a division by zero.

use crate::errors::VaultResult;
use crate::uint256::WideUint;

/// Rounding direction for a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Floor
    Down,
    /// Ceiling
    Up,
}

/// Convert assets to shares at the rate `total_shares / total_assets`
///
/// Formula: `assets * total_shares / total_assets`, or `assets` when either
/// `assets` or `total_shares` is zero.
///
/// # Errors
///
/// `Overflow` if the intermediate product exceeds 256 bits,
/// `DivisionByZero` if shares exist while `total_assets` is zero.
pub fn convert_to_shares(
    assets: WideUint,
    total_assets: WideUint,
    total_shares: WideUint,
    rounding: Rounding,
) -> VaultResult<WideUint> {
    if assets.is_zero() || total_shares.is_zero() {
        return Ok(assets);
    }
    match rounding {
        Rounding::Down => assets.mul_div_floor(total_shares, total_assets),
        Rounding::Up => assets.mul_div_ceil(total_shares, total_assets),
    }
}

/// Convert shares to assets at the rate `total_assets / total_shares`
///
/// Formula: `shares * total_assets / total_shares`, or `shares` when the
/// pool holds no shares.
///
/// # Errors
///
/// `Overflow` if the intermediate product exceeds 256 bits.
pub fn convert_to_assets(
    shares: WideUint,
    total_assets: WideUint,
    total_shares: WideUint,
    rounding: Rounding,
) -> VaultResult<WideUint> {
    if total_shares.is_zero() {
        return Ok(shares);
    }
    match rounding {
        Rounding::Down => shares.mul_div_floor(total_assets, total_shares),
        Rounding::Up => shares.mul_div_ceil(total_assets, total_shares),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VaultError;
    use proptest::prelude::*;

    fn w(v: u128) -> WideUint {
        WideUint::from(v)
    }

    #[test]
    fn test_empty_pool_is_one_to_one() {
        assert_eq!(convert_to_shares(w(1000), w(0), w(0), Rounding::Down), Ok(w(1000)));
        assert_eq!(convert_to_assets(w(1000), w(0), w(0), Rounding::Up), Ok(w(1000)));
    }

    #[test]
    fn test_zero_assets_converts_to_zero() {
        assert_eq!(convert_to_shares(w(0), w(0), w(500), Rounding::Down), Ok(w(0)));
    }

    #[test]
    fn test_rounding_direction() {
        // 3 assets backing 2 shares
        assert_eq!(convert_to_shares(w(2), w(3), w(2), Rounding::Down), Ok(w(1)));
        assert_eq!(convert_to_shares(w(2), w(3), w(2), Rounding::Up), Ok(w(2)));
        assert_eq!(convert_to_assets(w(1), w(3), w(2), Rounding::Down), Ok(w(1)));
        assert_eq!(convert_to_assets(w(1), w(3), w(2), Rounding::Up), Ok(w(2)));
    }

    #[test]
    fn test_shares_without_assets_is_division_by_zero() {
        assert_eq!(
            convert_to_shares(w(10), w(0), w(10), Rounding::Down),
            Err(VaultError::DivisionByZero)
        );
    }

    #[test]
    fn test_overflow_in_product() {
        let result = convert_to_shares(WideUint::MAX, w(1), w(2), Rounding::Down);
        assert_eq!(result, Err(VaultError::Overflow));
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_one_unit(
            assets in 0u128..1_000_000_000_000,
            total_assets in 1u128..1_000_000_000_000,
            extra_shares in 0u128..1_000_000_000_000,
        ) {
            // Shares at least as granular as assets: error stays below one unit
            let total_shares = total_assets + extra_shares;
            let shares = convert_to_shares(w(assets), w(total_assets), w(total_shares), Rounding::Down).unwrap();
            let back = convert_to_assets(shares, w(total_assets), w(total_shares), Rounding::Down).unwrap();
            prop_assert!(back <= w(assets));
            prop_assert!(w(assets).checked_sub(back).unwrap() <= WideUint::ONE);
        }

        #[test]
        fn prop_round_trip_exact_on_even_rate(
            assets in 0u128..1_000_000_000_000,
            multiplier in 1u128..1_000,
            total_assets in 1u128..1_000_000_000,
        ) {
            let total_shares = total_assets * multiplier;
            let shares = convert_to_shares(w(assets), w(total_assets), w(total_shares), Rounding::Down).unwrap();
            let back = convert_to_assets(shares, w(total_assets), w(total_shares), Rounding::Down).unwrap();
            prop_assert_eq!(back, w(assets));
        }

        #[test]
        fn prop_up_never_below_down(
            amount in 0u128..1_000_000_000_000,
            total_assets in 1u128..1_000_000_000_000,
            total_shares in 1u128..1_000_000_000_000,
        ) {
            let down = convert_to_shares(w(amount), w(total_assets), w(total_shares), Rounding::Down).unwrap();
            let up = convert_to_shares(w(amount), w(total_assets), w(total_shares), Rounding::Up).unwrap();
            prop_assert!(up >= down);
            prop_assert!(up <= down.checked_add(WideUint::ONE).unwrap());
        }
    }
}
