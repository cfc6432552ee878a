//! Treasury error taxonomy
//!
//! Every failure aborts its operation with a distinguishing reason so that
//! monitoring and tests can assert on cause. Errors are grouped by the
//! module family that raises them; cross-domain calls convert via `#[from]`.

use thiserror::Error;

/// Errors raised by the external fungible-token service.
///
/// The engine never swallows these — a failed token call surfaces to the
/// caller through the wrapping ledger/claim/commitment error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Token holder has insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: String, available: String },

    #[error("Token allowance too low: required {required}, approved {approved}")]
    InsufficientAllowance { required: String, approved: String },

    #[error("Token service does not track this asset")]
    UnknownAsset,
}

/// Errors raised while recovering a signer from a signature envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Signature envelope must be {expected} bytes, got {len}")]
    InvalidLength { expected: usize, len: usize },

    #[error("Embedded public key is not a valid curve point")]
    InvalidPublicKey,

    #[error("Signature verification failed")]
    VerificationFailed,
}

/// Balance-ledger and direct-transfer errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Contract is paused")]
    Paused,

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error("Currency not supported: {currency}")]
    CurrencyNotSupported { currency: String },

    #[error("Native value mismatch: declared {declared}, provided {provided}")]
    AmountMismatch { declared: String, provided: String },

    #[error("Insufficient balance for {currency}: required {required}, available {available}")]
    InsufficientBalance {
        currency: String,
        required: String,
        available: String,
    },

    #[error("No counterparty configured")]
    NoCounterParty,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Token transfer failed: {0}")]
    Token(#[from] TokenError),
}

/// Signed-claim and claim-request errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimError {
    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Contract is paused")]
    Paused,

    #[error("Currency not supported: {currency}")]
    CurrencyNotSupported { currency: String },

    #[error("Claim deadline passed: deadline {deadline}, now {now}")]
    Expired { deadline: i64, now: i64 },

    #[error("Message already claimed")]
    AlreadyClaimed,

    #[error("Request already approved")]
    AlreadyApproved,

    #[error("Unknown claim request: {id}")]
    UnknownRequest { id: u64 },

    #[error("Invalid signature: signer is not a truth holder")]
    InvalidSignature,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Merkle-commitment and committed-withdrawal errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommitmentError {
    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Contract is paused")]
    Paused,

    #[error("Contract is not paused: forced withdrawal requires the circuit breaker")]
    NotPaused,

    #[error("Currency not supported: {currency}")]
    CurrencyNotSupported { currency: String },

    #[error("Invalid signature: signer does not match the user in the message")]
    InvalidSignature,

    #[error("Invalid hash: message does not match the supplied leaf")]
    InvalidHash,

    #[error("Invalid user: caller does not match the user in the message")]
    InvalidUser,

    #[error("Invalid proof: Merkle verification failed")]
    InvalidProof,

    #[error("Insufficient balance: committed {committed}, already withdrawn {withdrawn}, requested {requested}")]
    InsufficientBalance {
        committed: String,
        withdrawn: String,
        requested: String,
    },

    #[error("No state commitment published")]
    NoCommitment,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
