//! External fungible-token service boundary
//!
//! The treasury never holds coins itself; it instructs the token service
//! to move them and mirrors the result in its own accounting. [`TokenPort`]
//! is that seam. Failures are typed and must be propagated by the engine,
//! never swallowed.
//!
//! [`MemoryToken`] is a standards-shaped in-memory implementation used by
//! the test suite as the external collaborator.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::address::Address;
use types::currency::Currency;

use crate::errors::TokenError;

/// Transfer and balance-query semantics of the external token service.
///
/// `Currency::Native` is handled uniformly: a native `transfer` is a value
/// transfer, a token `transfer` is an ERC20-style contract call.
pub trait TokenPort {
    /// Move `amount` from `from` to `to`. `from` must hold the funds.
    fn transfer(
        &mut self,
        currency: &Currency,
        from: &Address,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `caller`, consuming
    /// `from`'s allowance toward `caller`.
    fn transfer_from(
        &mut self,
        currency: &Currency,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), TokenError>;

    /// Current holdings of `holder`.
    fn balance_of(&self, currency: &Currency, holder: &Address) -> Decimal;
}

/// In-memory token service double with mint/approve administration.
#[derive(Debug, Default)]
pub struct MemoryToken {
    balances: HashMap<(Currency, Address), Decimal>,
    allowances: HashMap<(Currency, Address, Address), Decimal>,
}

impl MemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `to` out of thin air.
    pub fn mint(&mut self, currency: Currency, to: Address, amount: Decimal) {
        *self.balances.entry((currency, to)).or_insert(Decimal::ZERO) += amount;
    }

    /// Let `spender` move up to `amount` of `owner`'s funds.
    pub fn approve(&mut self, currency: Currency, owner: Address, spender: Address, amount: Decimal) {
        self.allowances.insert((currency, owner, spender), amount);
    }

    /// Remaining allowance from `owner` toward `spender`.
    pub fn allowance(&self, currency: &Currency, owner: &Address, spender: &Address) -> Decimal {
        self.allowances
            .get(&(*currency, *owner, *spender))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn debit(
        &mut self,
        currency: &Currency,
        holder: &Address,
        amount: Decimal,
    ) -> Result<(), TokenError> {
        let balance = self
            .balances
            .entry((*currency, *holder))
            .or_insert(Decimal::ZERO);
        if *balance < amount {
            return Err(TokenError::InsufficientFunds {
                required: amount.to_string(),
                available: balance.to_string(),
            });
        }
        *balance -= amount;
        Ok(())
    }
}

impl TokenPort for MemoryToken {
    fn transfer(
        &mut self,
        currency: &Currency,
        from: &Address,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), TokenError> {
        self.debit(currency, from, amount)?;
        *self.balances.entry((*currency, *to)).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        currency: &Currency,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), TokenError> {
        let key = (*currency, *from, *caller);
        let approved = self.allowances.get(&key).copied().unwrap_or(Decimal::ZERO);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance {
                required: amount.to_string(),
                approved: approved.to_string(),
            });
        }
        self.debit(currency, from, amount)?;
        self.allowances.insert(key, approved - amount);
        *self.balances.entry((*currency, *to)).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn balance_of(&self, currency: &Currency, holder: &Address) -> Decimal {
        self.balances
            .get(&(*currency, *holder))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    #[test]
    fn test_mint_and_balance() {
        let mut token = MemoryToken::new();
        token.mint(Currency::Native, addr(1), Decimal::from(100));
        assert_eq!(token.balance_of(&Currency::Native, &addr(1)), Decimal::from(100));
        assert_eq!(token.balance_of(&Currency::Native, &addr(2)), Decimal::ZERO);
    }

    #[test]
    fn test_transfer_moves_funds() {
        let mut token = MemoryToken::new();
        token.mint(Currency::Native, addr(1), Decimal::from(10));
        token
            .transfer(&Currency::Native, &addr(1), &addr(2), Decimal::from(4))
            .unwrap();
        assert_eq!(token.balance_of(&Currency::Native, &addr(1)), Decimal::from(6));
        assert_eq!(token.balance_of(&Currency::Native, &addr(2)), Decimal::from(4));
    }

    #[test]
    fn test_transfer_insufficient_funds() {
        let mut token = MemoryToken::new();
        token.mint(Currency::Native, addr(1), Decimal::from(1));
        let result = token.transfer(&Currency::Native, &addr(1), &addr(2), Decimal::from(5));
        assert!(matches!(result, Err(TokenError::InsufficientFunds { .. })));
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let usdt = Currency::Token(addr(9));
        let mut token = MemoryToken::new();
        token.mint(usdt, addr(1), Decimal::from(50));
        token.approve(usdt, addr(1), addr(3), Decimal::from(30));

        token
            .transfer_from(&usdt, &addr(3), &addr(1), &addr(3), Decimal::from(20))
            .unwrap();
        assert_eq!(token.balance_of(&usdt, &addr(3)), Decimal::from(20));
        assert_eq!(token.allowance(&usdt, &addr(1), &addr(3)), Decimal::from(10));
    }

    #[test]
    fn test_transfer_from_without_allowance() {
        let usdt = Currency::Token(addr(9));
        let mut token = MemoryToken::new();
        token.mint(usdt, addr(1), Decimal::from(50));

        let result = token.transfer_from(&usdt, &addr(3), &addr(1), &addr(3), Decimal::from(20));
        assert!(matches!(result, Err(TokenError::InsufficientAllowance { .. })));
    }
}
