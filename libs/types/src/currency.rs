//! Currency identifiers accepted by the treasury
//!
//! A currency is either the chain's native coin or a token identified by
//! its contract address. The packed byte encoding below is the canonical
//! form embedded in signed claim messages and Merkle leaves — a flag byte
//! followed by 32 address bytes (zero for native).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Address;

/// An accepted asset: the native coin or an ERC20-style token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// The chain's native coin.
    Native,
    /// A token contract address.
    Token(Address),
}

impl Currency {
    /// Length of the packed encoding: flag byte + 32 address bytes.
    pub const ENCODED_LEN: usize = 33;

    /// Canonical packed encoding used in hashed messages.
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        match self {
            Currency::Native => {
                out[0] = 1;
                // address slot stays Address::ZERO
            }
            Currency::Token(addr) => {
                out[0] = 0;
                out[1..].copy_from_slice(addr.as_bytes());
            }
        }
        out
    }

    /// Decode the packed form. Returns `None` for a malformed flag or a
    /// native flag carrying a non-zero address.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return None;
        }
        let mut addr = [0u8; 32];
        addr.copy_from_slice(&bytes[1..]);
        let addr = Address::from_bytes(addr);
        match bytes[0] {
            1 if addr.is_zero() => Some(Currency::Native),
            0 => Some(Currency::Token(addr)),
            _ => None,
        }
    }

    /// True for the native coin.
    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Native => write!(f, "native"),
            Currency::Token(addr) => write!(f, "token:{}", addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_native() {
        let enc = Currency::Native.encode();
        assert_eq!(enc[0], 1);
        assert_eq!(Currency::decode(&enc), Some(Currency::Native));
    }

    #[test]
    fn test_encode_decode_token() {
        let currency = Currency::Token(Address::from_bytes([7u8; 32]));
        assert_eq!(Currency::decode(&currency.encode()), Some(currency));
    }

    #[test]
    fn test_decode_rejects_bad_flag() {
        let mut enc = Currency::Native.encode();
        enc[0] = 9;
        assert_eq!(Currency::decode(&enc), None);
    }

    #[test]
    fn test_decode_rejects_native_with_address() {
        let mut enc = Currency::Native.encode();
        enc[5] = 1;
        assert_eq!(Currency::decode(&enc), None);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert_eq!(Currency::decode(&[0u8; 10]), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let currency = Currency::Token(Address::from_bytes([3u8; 32]));
        let json = serde_json::to_string(&currency).unwrap();
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(currency, back);
    }

    #[test]
    fn test_display() {
        assert_eq!(Currency::Native.to_string(), "native");
        assert!(Currency::Token(Address::ZERO).to_string().starts_with("token:"));
    }
}
