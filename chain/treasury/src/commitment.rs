//! Merkle commitment store
//!
//! Holds the latest published state root plus a pointer to the off-chain
//! data behind it, and tracks how much of each committed entitlement has
//! already been paid out. The committed amount in a leaf is *cumulative*:
//! each proof-based withdrawal increases a per-(user, currency) counter
//! and the counter may never exceed the committed amount.
//!
//! The engine cannot audit a root's internal correctness — that is an
//! operational contract with the owner who publishes it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::address::Address;
use types::currency::Currency;

use crate::errors::{CommitmentError, LedgerError};
use crate::merkle::{compute_hash, Hash};

/// The active commitment: root, off-chain data pointer, and a version
/// counter incremented on every replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCommitment {
    pub root: Hash,
    pub data_pointer: String,
    pub version: u64,
    pub updated_at: i64,
}

/// Leaf preimage: a user's cumulative entitlement in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementMessage {
    pub user: Address,
    pub currency: Currency,
    pub cumulative_amount: Decimal,
}

impl EntitlementMessage {
    /// Packed length: user ‖ currency ‖ cumulative amount.
    pub const ENCODED_LEN: usize = 32 + Currency::ENCODED_LEN + 16;

    /// Canonical fixed-field byte encoding.
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[..32].copy_from_slice(self.user.as_bytes());
        out[32..32 + Currency::ENCODED_LEN].copy_from_slice(&self.currency.encode());
        out[32 + Currency::ENCODED_LEN..].copy_from_slice(&self.cumulative_amount.serialize());
        out
    }

    /// Merkle leaf hash of this entitlement.
    pub fn leaf_hash(&self) -> Hash {
        compute_hash(&self.encode())
    }
}

/// Commitment store: the active record and the withdrawn counters.
#[derive(Debug, Clone, Default)]
pub struct CommitmentStore {
    active: Option<StateCommitment>,
    withdrawn: HashMap<(Address, Currency), Decimal>,
}

impl CommitmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active commitment. Monotonicity of entitlements across
    /// roots is an off-chain trust assumption, not enforced here.
    pub fn update(&mut self, root: Hash, data_pointer: String, now: i64) -> &StateCommitment {
        let version = self.active.as_ref().map_or(1, |c| c.version + 1);
        self.active.insert(StateCommitment {
            root,
            data_pointer,
            version,
            updated_at: now,
        })
    }

    /// The active commitment, if one has been published.
    pub fn active(&self) -> Option<&StateCommitment> {
        self.active.as_ref()
    }

    /// Cumulative amount already withdrawn by (user, currency).
    pub fn withdrawn_of(&self, user: &Address, currency: &Currency) -> Decimal {
        self.withdrawn
            .get(&(*user, *currency))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Record a withdrawal against a committed cumulative entitlement.
    ///
    /// Fails whole, without mutating the counter, if the request would push
    /// total withdrawals past the committed amount.
    pub fn register_withdrawal(
        &mut self,
        user: &Address,
        currency: &Currency,
        amount: Decimal,
        committed: Decimal,
    ) -> Result<(), CommitmentError> {
        let withdrawn = self.withdrawn_of(user, currency);
        let total = withdrawn
            .checked_add(amount)
            .ok_or(CommitmentError::Ledger(LedgerError::Overflow))?;
        if total > committed {
            return Err(CommitmentError::InsufficientBalance {
                committed: committed.to_string(),
                withdrawn: withdrawn.to_string(),
                requested: amount.to_string(),
            });
        }
        self.withdrawn.insert((*user, *currency), total);
        Ok(())
    }

    /// Undo a registered withdrawal after a failed transfer.
    pub fn unregister_withdrawal(&mut self, user: &Address, currency: &Currency, amount: Decimal) {
        if let Some(entry) = self.withdrawn.get_mut(&(*user, *currency)) {
            *entry -= amount;
        }
    }
}
