//! Signed claim messages and replay protection
//!
//! A claim's identity is its exact packed byte encoding: two claims that
//! differ in any field hash differently, and a consumed hash can never
//! authorize a second payout. The packed form is what truth holders sign.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use types::address::Address;
use types::currency::Currency;

use crate::merkle::{compute_hash, Hash};

/// A structured claim, attested off-chain by a truth holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimMessage {
    pub nonce: u64,
    pub recipient: Address,
    pub currency: Currency,
    pub amount: Decimal,
    pub deadline: i64,
}

impl ClaimMessage {
    /// Packed length: nonce ‖ recipient ‖ currency ‖ amount ‖ deadline.
    pub const ENCODED_LEN: usize = 8 + 32 + Currency::ENCODED_LEN + 16 + 8;

    /// Canonical fixed-field byte encoding. The amount uses
    /// `Decimal::serialize`, a stable 16-byte little-endian form.
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        let mut at = 0;

        out[at..at + 8].copy_from_slice(&self.nonce.to_be_bytes());
        at += 8;
        out[at..at + 32].copy_from_slice(self.recipient.as_bytes());
        at += 32;
        out[at..at + Currency::ENCODED_LEN].copy_from_slice(&self.currency.encode());
        at += Currency::ENCODED_LEN;
        out[at..at + 16].copy_from_slice(&self.amount.serialize());
        at += 16;
        out[at..at + 8].copy_from_slice(&self.deadline.to_be_bytes());

        out
    }

    /// Hash identity of the claim.
    pub fn hash(&self) -> Hash {
        compute_hash(&self.encode())
    }
}

/// Consumed-claim book. Marking a hash is permanent under normal flow;
/// the rollback hook exists only for a failed downstream token transfer.
#[derive(Debug, Clone, Default)]
pub struct ClaimBook {
    consumed: HashSet<Hash>,
}

impl ClaimBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a claim hash has been consumed.
    pub fn is_consumed(&self, hash: &Hash) -> bool {
        self.consumed.contains(hash)
    }

    /// Mark a claim consumed. Returns `false` on replay.
    pub fn consume(&mut self, hash: Hash) -> bool {
        self.consumed.insert(hash)
    }

    /// Undo a consumption after a failed transfer.
    pub fn release(&mut self, hash: &Hash) {
        self.consumed.remove(hash);
    }

    /// Number of consumed claims.
    pub fn count(&self) -> usize {
        self.consumed.len()
    }
}
