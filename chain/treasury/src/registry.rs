//! Currency registry
//!
//! Tracks which asset identifiers the treasury accepts. Removal is a
//! circuit breaker on *new* deposits and standard withdrawals, not a
//! fund-seizure mechanism — balances already recorded in a removed
//! currency stay queryable.

use std::collections::HashSet;
use types::currency::Currency;

/// Accepted-currency set. Owner gating happens at the treasury facade.
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    accepted: HashSet<Currency>,
}

impl CurrencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a currency. Idempotent.
    pub fn add(&mut self, currency: Currency) {
        self.accepted.insert(currency);
    }

    /// Stop accepting a currency.
    pub fn remove(&mut self, currency: &Currency) {
        self.accepted.remove(currency);
    }

    /// Check whether a currency is accepted.
    pub fn is_supported(&self, currency: &Currency) -> bool {
        self.accepted.contains(currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::address::Address;

    #[test]
    fn test_add_and_check() {
        let mut registry = CurrencyRegistry::new();
        registry.add(Currency::Native);
        assert!(registry.is_supported(&Currency::Native));
        assert!(!registry.is_supported(&Currency::Token(Address::ZERO)));
    }

    #[test]
    fn test_add_idempotent() {
        let mut registry = CurrencyRegistry::new();
        registry.add(Currency::Native);
        registry.add(Currency::Native);
        assert!(registry.is_supported(&Currency::Native));
    }

    #[test]
    fn test_remove() {
        let usdt = Currency::Token(Address::from_bytes([9u8; 32]));
        let mut registry = CurrencyRegistry::new();
        registry.add(usdt);
        registry.remove(&usdt);
        assert!(!registry.is_supported(&usdt));
    }
}
