//! Balance ledger — per-user entitlements and contract float
//!
//! Two distinct accounting domains live here and never bridge implicitly:
//!
//! - `balances`: what each user may withdraw, keyed (user, currency).
//! - `holdings`: what the treasury itself holds per currency (float).
//!
//! A deposit credits both; a user withdrawal debits both; a liquidity
//! sweep to the counterparty debits float only. All mutation is checked —
//! a debit beyond the current value fails whole, no partial application.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::address::Address;
use types::currency::Currency;

use crate::errors::LedgerError;

/// Ledger state: user entitlements plus contract float.
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    /// Balances: user -> (currency -> amount)
    balances: HashMap<Address, HashMap<Currency, Decimal>>,
    /// Contract-held float per currency
    holdings: HashMap<Currency, Decimal>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Entitlement of `user` in `currency`. Missing entries read as zero.
    pub fn balance_of(&self, user: &Address, currency: &Currency) -> Decimal {
        self.balances
            .get(user)
            .and_then(|by_currency| by_currency.get(currency))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Contract float in `currency`.
    pub fn holdings_of(&self, currency: &Currency) -> Decimal {
        self.holdings.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of all user entitlements in `currency` (solvency checks).
    pub fn total_balances(&self, currency: &Currency) -> Decimal {
        self.balances
            .values()
            .filter_map(|by_currency| by_currency.get(currency))
            .sum()
    }

    // ───────────────────────── Entitlements ─────────────────────────

    /// Credit a user's entitlement, with overflow protection.
    pub fn credit(
        &mut self,
        user: &Address,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let entry = self
            .balances
            .entry(*user)
            .or_default()
            .entry(*currency)
            .or_insert(Decimal::ZERO);
        *entry = entry.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Debit a user's entitlement. Fails whole if the balance is short.
    pub fn debit(
        &mut self,
        user: &Address,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(user, currency);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                currency: currency.to_string(),
                required: amount.to_string(),
                available: available.to_string(),
            });
        }
        let entry = self
            .balances
            .entry(*user)
            .or_default()
            .entry(*currency)
            .or_insert(Decimal::ZERO);
        *entry = entry.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    // ───────────────────────── Float ─────────────────────────

    /// Record funds arriving at the treasury.
    pub fn credit_holdings(
        &mut self,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let entry = self.holdings.entry(*currency).or_insert(Decimal::ZERO);
        *entry = entry.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Record funds leaving the treasury. Fails whole if the float is short.
    pub fn debit_holdings(
        &mut self,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let held = self.holdings_of(currency);
        if held < amount {
            return Err(LedgerError::InsufficientBalance {
                currency: currency.to_string(),
                required: amount.to_string(),
                available: held.to_string(),
            });
        }
        let entry = self.holdings.entry(*currency).or_insert(Decimal::ZERO);
        *entry = entry.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    #[test]
    fn test_balance_defaults_to_zero() {
        let ledger = BalanceLedger::new();
        assert_eq!(ledger.balance_of(&addr(1), &Currency::Native), Decimal::ZERO);
        assert_eq!(ledger.holdings_of(&Currency::Native), Decimal::ZERO);
    }

    #[test]
    fn test_credit_accumulates() {
        let mut ledger = BalanceLedger::new();
        ledger.credit(&addr(1), &Currency::Native, Decimal::from(100)).unwrap();
        ledger.credit(&addr(1), &Currency::Native, Decimal::from(50)).unwrap();
        assert_eq!(ledger.balance_of(&addr(1), &Currency::Native), Decimal::from(150));
    }

    #[test]
    fn test_debit_success() {
        let mut ledger = BalanceLedger::new();
        ledger.credit(&addr(1), &Currency::Native, Decimal::from(10)).unwrap();
        ledger.debit(&addr(1), &Currency::Native, Decimal::from(3)).unwrap();
        assert_eq!(ledger.balance_of(&addr(1), &Currency::Native), Decimal::from(7));
    }

    #[test]
    fn test_debit_insufficient_leaves_state_unchanged() {
        let mut ledger = BalanceLedger::new();
        ledger.credit(&addr(1), &Currency::Native, Decimal::from(1)).unwrap();

        let result = ledger.debit(&addr(1), &Currency::Native, Decimal::from(5));
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(ledger.balance_of(&addr(1), &Currency::Native), Decimal::from(1));
    }

    #[test]
    fn test_debit_unknown_user() {
        let mut ledger = BalanceLedger::new();
        let result = ledger.debit(&addr(1), &Currency::Native, Decimal::from(1));
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_users_and_currencies_isolated() {
        let usdt = Currency::Token(addr(9));
        let mut ledger = BalanceLedger::new();
        ledger.credit(&addr(1), &Currency::Native, Decimal::from(10)).unwrap();
        ledger.credit(&addr(2), &usdt, Decimal::from(20)).unwrap();

        assert_eq!(ledger.balance_of(&addr(1), &usdt), Decimal::ZERO);
        assert_eq!(ledger.balance_of(&addr(2), &Currency::Native), Decimal::ZERO);
    }

    #[test]
    fn test_holdings_separate_from_balances() {
        let mut ledger = BalanceLedger::new();
        ledger.credit_holdings(&Currency::Native, Decimal::from(100)).unwrap();
        assert_eq!(ledger.balance_of(&addr(1), &Currency::Native), Decimal::ZERO);

        ledger.debit_holdings(&Currency::Native, Decimal::from(40)).unwrap();
        assert_eq!(ledger.holdings_of(&Currency::Native), Decimal::from(60));
    }

    #[test]
    fn test_debit_holdings_insufficient() {
        let mut ledger = BalanceLedger::new();
        ledger.credit_holdings(&Currency::Native, Decimal::from(5)).unwrap();
        let result = ledger.debit_holdings(&Currency::Native, Decimal::from(6));
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(ledger.holdings_of(&Currency::Native), Decimal::from(5));
    }

    #[test]
    fn test_total_balances() {
        let mut ledger = BalanceLedger::new();
        ledger.credit(&addr(1), &Currency::Native, Decimal::from(10)).unwrap();
        ledger.credit(&addr(2), &Currency::Native, Decimal::from(15)).unwrap();
        assert_eq!(ledger.total_balances(&Currency::Native), Decimal::from(25));
    }
}
