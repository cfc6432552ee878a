//! Treasury events
//!
//! Events are immutable records appended by treasury operations, one per
//! successful state transition. Off-chain monitoring consumes them through
//! `Treasury::events` / `Treasury::drain_events`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::address::Address;
use types::currency::Currency;

/// Funds credited to a user's ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub payer: Address,
    pub recipient: Address,
    pub amount: Decimal,
    pub currency: Currency,
}

/// Funds left the treasury — direct withdrawal, committed withdrawal,
/// or forced withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub recipient: Address,
    pub amount: Decimal,
    pub currency: Currency,
}

/// A signed claim or an approved claim request paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claimed {
    pub recipient: Address,
    pub amount: Decimal,
    pub currency: Currency,
}

/// A currency was added to the accepted set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAdded {
    pub currency: Currency,
}

/// A currency was removed from the accepted set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRemoved {
    pub currency: Currency,
}

/// A new state root and data pointer replaced the active commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdated {
    pub root: [u8; 32],
    pub data_pointer: String,
    pub version: u64,
}

/// Owner created a pending claim request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequestCreated {
    pub id: u64,
    pub recipient: Address,
    pub amount: Decimal,
    pub currency: Currency,
    pub deadline: i64,
}

/// Operator role reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOperator {
    pub operator: Address,
}

/// Counterparty destination reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCounterParty {
    pub counter_party: Address,
}

/// Truth-holder set changed (single-holder swap, or set add/remove).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTruthHolder {
    pub truth_holder: Address,
    pub added: bool,
}

/// Enum wrapper for all treasury events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasuryEvent {
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    Claimed(Claimed),
    CurrencyAdded(CurrencyAdded),
    CurrencyRemoved(CurrencyRemoved),
    Paused,
    Unpaused,
    NewOperator(NewOperator),
    NewCounterParty(NewCounterParty),
    NewTruthHolder(NewTruthHolder),
    ClaimRequestCreated(ClaimRequestCreated),
    StateUpdated(StateUpdated),
}
