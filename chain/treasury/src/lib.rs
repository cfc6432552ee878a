//! Custodial treasury engine
//!
//! A single-account custody core: users deposit supported currencies,
//! the operator manages liquidity, and funds leave only through gated
//! paths — administrative withdrawal, truth-holder-signed claims,
//! approved claim requests, or Merkle-proof exits against a published
//! state commitment while the breaker is pulled.
//!
//! State changes always land before the external token transfer, and a
//! failed transfer rolls the change back, so every entry point is
//! all-or-nothing.

pub mod claims;
pub mod commitment;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod merkle;
pub mod registry;
pub mod requests;
pub mod security;
pub mod signing;
pub mod token;
pub mod treasury;

pub use claims::ClaimMessage;
pub use commitment::{EntitlementMessage, StateCommitment};
pub use errors::{ClaimError, CommitmentError, LedgerError, SignatureError, TokenError};
pub use events::TreasuryEvent;
pub use security::TruthHolders;
pub use token::{MemoryToken, TokenPort};
pub use treasury::Treasury;
