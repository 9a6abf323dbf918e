//! Fungible Ledger
//!
//! Balances, total supply and the spender-allowance table behind both the
//! vault share token and the reference asset token.
//!
//! ## Invariants
//!
//! - `total_supply == sum(balances)` after every operation
//! - Zero entries are removed; absence and zero are the same thing
//! - An allowance equal to [`UNLIMITED_ALLOWANCE`] is never decremented
//! - Every mutating method validates fully before writing, so a returned
//!   error leaves the ledger untouched

use crate::BTreeMap;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::limits::UNLIMITED_ALLOWANCE;
use crate::errors::{VaultError, VaultResult};
use crate::events::{EventLog, VaultEvent};
use crate::types::{is_zero_address, Address, ZERO_ADDRESS};
use crate::uint256::WideUint;

/// Balances and allowances of one fungible token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct FungibleLedger {
    total_supply: WideUint,
    balances: BTreeMap<Address, WideUint>,
    /// `(owner, spender) -> remaining`
    allowances: BTreeMap<(Address, Address), WideUint>,
}

impl FungibleLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Reads ============

    /// Sum of all balances
    pub fn total_supply(&self) -> WideUint {
        self.total_supply
    }

    /// Balance of `owner`, zero if never written
    pub fn balance_of(&self, owner: &Address) -> WideUint {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    /// Remaining allowance of `spender` over `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> WideUint {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Number of addresses holding a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Recompute the sum of balances (for invariant checks)
    pub fn sum_of_balances(&self) -> VaultResult<WideUint> {
        self.balances
            .values()
            .try_fold(WideUint::ZERO, |acc, b| acc.checked_add(*b))
    }

    // ============ Pre-checks ============

    /// Fails with `InsufficientBalance` unless `owner` holds `amount`
    pub fn ensure_balance(&self, owner: &Address, amount: WideUint) -> VaultResult<()> {
        let available = self.balance_of(owner);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Fails with `InsufficientAllowance` unless `spender` may consume
    /// `amount` of `owner`'s balance. Acting on one's own balance needs no
    /// allowance.
    pub fn ensure_allowance(
        &self,
        owner: &Address,
        spender: &Address,
        amount: WideUint,
    ) -> VaultResult<()> {
        if owner == spender {
            return Ok(());
        }
        self.ensure_approved(owner, spender, amount)
    }

    /// Like [`ensure_allowance`](Self::ensure_allowance), but `owner` gets
    /// no exemption: an explicit approval must cover `amount`
    fn ensure_approved(&self, owner: &Address, spender: &Address, amount: WideUint) -> VaultResult<()> {
        let available = self.allowance(owner, spender);
        if available == UNLIMITED_ALLOWANCE {
            return Ok(());
        }
        if available < amount {
            return Err(VaultError::InsufficientAllowance {
                available,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Fails with `Overflow` if minting `amount` would exceed 256 bits
    pub fn ensure_mintable(&self, to: &Address, amount: WideUint) -> VaultResult<()> {
        require_nonzero(to, "mint to zero address")?;
        self.total_supply.checked_add(amount)?;
        Ok(())
    }

    // ============ Supply Changes ============

    /// Credit `amount` new units to `to`
    pub fn mint(&mut self, to: &Address, amount: WideUint, events: &mut EventLog) -> VaultResult<()> {
        require_nonzero(to, "mint to zero address")?;
        let new_supply = self.total_supply.checked_add(amount)?;
        // balance <= supply, so this cannot overflow once the supply check passed
        let new_balance = self.balance_of(to).checked_add(amount)?;

        self.total_supply = new_supply;
        self.set_balance(to, new_balance);

        events.emit(VaultEvent::Transfer {
            from: ZERO_ADDRESS,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Destroy `amount` units held by `from`
    pub fn burn(&mut self, from: &Address, amount: WideUint, events: &mut EventLog) -> VaultResult<()> {
        require_nonzero(from, "burn from zero address")?;
        self.ensure_balance(from, amount)?;
        let new_balance = self.balance_of(from).checked_sub(amount)?;
        let new_supply = self.total_supply.checked_sub(amount)?;

        self.total_supply = new_supply;
        self.set_balance(from, new_balance);

        events.emit(VaultEvent::Transfer {
            from: *from,
            to: ZERO_ADDRESS,
            amount,
        });
        Ok(())
    }

    // ============ Transfers ============

    /// Move `amount` from `from` to `to`
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        require_nonzero(from, "transfer from zero address")?;
        require_nonzero(to, "transfer to zero address")?;
        self.ensure_balance(from, amount)?;

        if from != to {
            let from_balance = self.balance_of(from).checked_sub(amount)?;
            let to_balance = self.balance_of(to).checked_add(amount)?;
            self.set_balance(from, from_balance);
            self.set_balance(to, to_balance);
        }

        events.emit(VaultEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, always
    /// consuming `allowance(from, spender)`
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        require_nonzero(from, "transfer from zero address")?;
        require_nonzero(to, "transfer to zero address")?;
        self.ensure_approved(from, spender, amount)?;
        self.ensure_balance(from, amount)?;

        self.spend_approved(from, spender, amount)?;
        self.transfer(from, to, amount, events)
    }

    // ============ Allowances ============

    /// Set `spender`'s allowance over `owner`'s balance, replacing any
    /// previous value
    pub fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        require_nonzero(owner, "approve from zero address")?;
        require_nonzero(spender, "approve to zero address")?;

        self.set_allowance(owner, spender, amount);
        events.emit(VaultEvent::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    /// Raise an allowance by `added`
    pub fn increase_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        added: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        let new_amount = self.allowance(owner, spender).checked_add(added)?;
        self.approve(owner, spender, new_amount, events)
    }

    /// Lower an allowance by `subtracted`; going below zero is an error
    pub fn decrease_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        subtracted: WideUint,
        events: &mut EventLog,
    ) -> VaultResult<()> {
        let available = self.allowance(owner, spender);
        let new_amount = available
            .checked_sub(subtracted)
            .map_err(|_| VaultError::InsufficientAllowance {
                available,
                requested: subtracted,
            })?;
        self.approve(owner, spender, new_amount, events)
    }

    /// Consume `amount` of `spender`'s allowance over `owner`.
    ///
    /// No-op when `spender == owner` or the allowance is unlimited.
    pub fn spend_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: WideUint,
    ) -> VaultResult<()> {
        if owner == spender {
            return Ok(());
        }
        self.spend_approved(owner, spender, amount)
    }

    fn spend_approved(&mut self, owner: &Address, spender: &Address, amount: WideUint) -> VaultResult<()> {
        self.ensure_approved(owner, spender, amount)?;
        let current = self.allowance(owner, spender);
        if current == UNLIMITED_ALLOWANCE {
            return Ok(());
        }
        self.set_allowance(owner, spender, current.checked_sub(amount)?);
        Ok(())
    }

    // ============ Storage Helpers ============

    fn set_balance(&mut self, owner: &Address, value: WideUint) {
        if value.is_zero() {
            self.balances.remove(owner);
        } else {
            self.balances.insert(*owner, value);
        }
    }

    fn set_allowance(&mut self, owner: &Address, spender: &Address, value: WideUint) {
        if value.is_zero() {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), value);
        }
    }
}

fn require_nonzero(address: &Address, reason: &'static str) -> VaultResult<()> {
    if is_zero_address(address) {
        return Err(VaultError::InvalidAddress { reason });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;

    fn alice() -> Address {
        [1u8; 32]
    }

    fn bob() -> Address {
        [2u8; 32]
    }

    fn carol() -> Address {
        [3u8; 32]
    }

    fn amt(v: u64) -> WideUint {
        WideUint::from(v)
    }

    fn funded() -> (FungibleLedger, EventLog) {
        let mut ledger = FungibleLedger::new();
        let mut events = EventLog::new();
        ledger.mint(&alice(), amt(1_000), &mut events).unwrap();
        (ledger, events)
    }

    #[test]
    fn test_mint_and_burn_track_supply() {
        let (mut ledger, mut events) = funded();
        assert_eq!(ledger.total_supply(), amt(1_000));
        assert_eq!(ledger.balance_of(&alice()), amt(1_000));

        ledger.burn(&alice(), amt(400), &mut events).unwrap();
        assert_eq!(ledger.total_supply(), amt(600));
        assert_eq!(ledger.sum_of_balances().unwrap(), amt(600));
        assert_eq!(events.filter_by_type(EventType::Transfer).len(), 2);
    }

    #[test]
    fn test_burn_insufficient() {
        let (mut ledger, mut events) = funded();
        let before = ledger.clone();
        let result = ledger.burn(&alice(), amt(1_001), &mut events);
        assert!(matches!(result, Err(VaultError::InsufficientBalance { .. })));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_mint_overflow() {
        let mut ledger = FungibleLedger::new();
        let mut events = EventLog::new();
        ledger.mint(&alice(), WideUint::MAX, &mut events).unwrap();
        let result = ledger.mint(&bob(), WideUint::ONE, &mut events);
        assert_eq!(result, Err(VaultError::Overflow));
        assert_eq!(ledger.balance_of(&bob()), WideUint::ZERO);
    }

    #[test]
    fn test_zero_address_rejected() {
        let (mut ledger, mut events) = funded();
        assert!(matches!(
            ledger.mint(&ZERO_ADDRESS, amt(1), &mut events),
            Err(VaultError::InvalidAddress { .. })
        ));
        assert!(matches!(
            ledger.transfer(&alice(), &ZERO_ADDRESS, amt(1), &mut events),
            Err(VaultError::InvalidAddress { .. })
        ));
        assert!(matches!(
            ledger.approve(&alice(), &ZERO_ADDRESS, amt(1), &mut events),
            Err(VaultError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_transfer_conserves_supply() {
        let (mut ledger, mut events) = funded();
        ledger.transfer(&alice(), &bob(), amt(250), &mut events).unwrap();
        ledger.transfer(&bob(), &bob(), amt(250), &mut events).unwrap();

        assert_eq!(ledger.balance_of(&alice()), amt(750));
        assert_eq!(ledger.balance_of(&bob()), amt(250));
        assert_eq!(ledger.sum_of_balances().unwrap(), ledger.total_supply());
    }

    #[test]
    fn test_zero_balance_entries_removed() {
        let (mut ledger, mut events) = funded();
        ledger.transfer(&alice(), &bob(), amt(1_000), &mut events).unwrap();
        assert_eq!(ledger.holder_count(), 1);
        assert_eq!(ledger.balance_of(&alice()), WideUint::ZERO);
    }

    #[test]
    fn test_approve_replaces() {
        let (mut ledger, mut events) = funded();
        ledger.approve(&alice(), &bob(), amt(100), &mut events).unwrap();
        ledger.approve(&alice(), &bob(), amt(30), &mut events).unwrap();
        assert_eq!(ledger.allowance(&alice(), &bob()), amt(30));
        assert_eq!(ledger.allowance(&bob(), &alice()), WideUint::ZERO);
        assert_eq!(events.filter_by_type(EventType::Approval).len(), 2);
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let (mut ledger, mut events) = funded();
        ledger.approve(&alice(), &bob(), amt(300), &mut events).unwrap();

        ledger
            .transfer_from(&bob(), &alice(), &carol(), amt(300), &mut events)
            .unwrap();
        assert_eq!(ledger.allowance(&alice(), &bob()), WideUint::ZERO);
        assert_eq!(ledger.balance_of(&carol()), amt(300));

        let before = ledger.clone();
        let result = ledger.transfer_from(&bob(), &alice(), &carol(), amt(1), &mut events);
        assert!(matches!(result, Err(VaultError::InsufficientAllowance { .. })));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_transfer_from_failed_balance_keeps_allowance() {
        let (mut ledger, mut events) = funded();
        ledger.approve(&alice(), &bob(), amt(5_000), &mut events).unwrap();

        let result = ledger.transfer_from(&bob(), &alice(), &carol(), amt(2_000), &mut events);
        assert!(matches!(result, Err(VaultError::InsufficientBalance { .. })));
        assert_eq!(ledger.allowance(&alice(), &bob()), amt(5_000));
    }

    #[test]
    fn test_unlimited_allowance_not_decremented() {
        let (mut ledger, mut events) = funded();
        ledger
            .approve(&alice(), &bob(), UNLIMITED_ALLOWANCE, &mut events)
            .unwrap();
        ledger
            .transfer_from(&bob(), &alice(), &bob(), amt(999), &mut events)
            .unwrap();
        assert_eq!(ledger.allowance(&alice(), &bob()), WideUint::MAX);
    }

    #[test]
    fn test_transfer_from_own_balance_requires_approval() {
        let (mut ledger, mut events) = funded();
        let before = ledger.clone();
        let result = ledger.transfer_from(&alice(), &alice(), &bob(), amt(10), &mut events);
        assert_eq!(
            result,
            Err(VaultError::InsufficientAllowance {
                available: WideUint::ZERO,
                requested: amt(10),
            })
        );
        assert_eq!(ledger, before);

        ledger.approve(&alice(), &alice(), amt(10), &mut events).unwrap();
        ledger
            .transfer_from(&alice(), &alice(), &bob(), amt(10), &mut events)
            .unwrap();
        assert_eq!(ledger.balance_of(&bob()), amt(10));
        assert_eq!(ledger.allowance(&alice(), &alice()), WideUint::ZERO);
    }

    #[test]
    fn test_spend_allowance_exempts_owner() {
        let (mut ledger, _) = funded();
        assert_eq!(ledger.ensure_allowance(&alice(), &alice(), amt(500)), Ok(()));
        assert_eq!(ledger.spend_allowance(&alice(), &alice(), amt(500)), Ok(()));
        assert_eq!(
            ledger.spend_allowance(&alice(), &bob(), amt(1)),
            Err(VaultError::InsufficientAllowance {
                available: WideUint::ZERO,
                requested: amt(1),
            })
        );
    }

    #[test]
    fn test_increase_decrease_allowance() {
        let (mut ledger, mut events) = funded();
        ledger.increase_allowance(&alice(), &bob(), amt(50), &mut events).unwrap();
        ledger.increase_allowance(&alice(), &bob(), amt(25), &mut events).unwrap();
        assert_eq!(ledger.allowance(&alice(), &bob()), amt(75));

        ledger.decrease_allowance(&alice(), &bob(), amt(75), &mut events).unwrap();
        assert_eq!(ledger.allowance(&alice(), &bob()), WideUint::ZERO);

        let result = ledger.decrease_allowance(&alice(), &bob(), amt(1), &mut events);
        assert!(matches!(result, Err(VaultError::InsufficientAllowance { .. })));

        ledger.approve(&alice(), &bob(), WideUint::MAX, &mut events).unwrap();
        assert_eq!(
            ledger.increase_allowance(&alice(), &bob(), amt(1), &mut events),
            Err(VaultError::Overflow)
        );
    }
}
