//! Balance ledger: per-owner balances, allowances and the total staked counter.
//!
//! Amounts are stored as `U128`. The public surface speaks `U256`, so every
//! incoming amount goes through [`narrow`] first.

use odra::casper_types::{U128, U256};
use odra::prelude::*;

#[odra::odra_error]
pub enum LedgerError {
    InsufficientBalance = 1,
    InsufficientAllowance = 2,
    AmountOverflow = 3,
}

/// Narrow an interface amount to the stored 128-bit width.
pub fn narrow(amount: U256) -> Result<U128, LedgerError> {
    if amount > U256::from(u128::MAX) {
        return Err(LedgerError::AmountOverflow);
    }
    Ok(U128::from(amount.as_u128()))
}

/// Widen a stored amount back to the interface width.
pub fn widen(amount: U128) -> U256 {
    U256::from(amount.as_u128())
}

#[odra::module]
pub struct BalanceLedger {
    balances: Mapping<Address, U128>,
    allowances: Mapping<(Address, Address), U128>,
    total_staked: Var<U128>,
}

#[odra::module]
impl BalanceLedger {
    pub fn balance_of(&self, owner: &Address) -> U128 {
        self.balances.get(owner).unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U128 {
        self.allowances.get(&(*owner, *spender)).unwrap_or_default()
    }

    pub fn total_staked(&self) -> U128 {
        self.total_staked.get_or_default()
    }

    /// Credit `owner` with freshly staked principal.
    pub fn mint(&mut self, owner: &Address, amount: U128) {
        let total = self
            .total_staked()
            .checked_add(amount)
            .unwrap_or_else(|| self.env().revert(LedgerError::AmountOverflow));
        // bounded by total
        let balance = self.balance_of(owner) + amount;
        self.total_staked.set(total);
        self.balances.set(owner, balance);
    }

    /// Remove principal from `owner`.
    pub fn burn(&mut self, owner: &Address, amount: U128) {
        let balance = self.balance_of(owner);
        if balance < amount {
            self.env().revert(LedgerError::InsufficientBalance);
        }
        self.balances.set(owner, balance - amount);
        self.total_staked.set(self.total_staked() - amount);
    }

    /// Move `amount` between owners; `total_staked` is untouched.
    pub fn transfer(&mut self, sender: &Address, recipient: &Address, amount: U128) {
        let balance = self.balance_of(sender);
        if balance < amount {
            self.env().revert(LedgerError::InsufficientBalance);
        }
        if sender == recipient || amount.is_zero() {
            return;
        }
        self.balances.set(sender, balance - amount);
        let credited = self.balance_of(recipient) + amount;
        self.balances.set(recipient, credited);
    }

    pub fn set_allowance(&mut self, owner: &Address, spender: &Address, amount: U128) {
        self.allowances.set(&(*owner, *spender), amount);
    }

    /// Consume `amount` of the allowance `owner` granted to `spender`.
    pub fn spend_allowance(&mut self, owner: &Address, spender: &Address, amount: U128) {
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            self.env().revert(LedgerError::InsufficientAllowance);
        }
        self.set_allowance(owner, spender, allowance - amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_accepts_full_u128_range() {
        assert_eq!(narrow(U256::zero()).ok(), Some(U128::zero()));
        assert_eq!(narrow(U256::from(u128::MAX)).ok(), Some(U128::from(u128::MAX)));
    }

    #[test]
    fn narrow_rejects_wider_amounts() {
        let wide = U256::from(u128::MAX) + U256::one();
        assert!(matches!(narrow(wide), Err(LedgerError::AmountOverflow)));
    }

    #[test]
    fn widen_preserves_value() {
        assert_eq!(widen(U128::from(42u64)), U256::from(42u64));
    }
}
