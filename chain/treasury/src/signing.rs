//! Signer recovery for claim and withdrawal authorization
//!
//! Signatures arrive as a 96-byte envelope: the signer's 32-byte ed25519
//! verifying key followed by the 64-byte signature over the message bytes.
//! Recovery parses the key, verifies the signature, and returns the
//! signer's [`Address`] (which *is* the verifying key). Callers compare
//! that address against whatever the operation requires — the user encoded
//! in the message, or a registered truth holder.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use types::address::Address;

use crate::errors::SignatureError;

/// Envelope length: 32-byte verifying key + 64-byte signature.
pub const ENVELOPE_LEN: usize = 96;

/// Recover the signer address from a signature envelope.
///
/// Pure function: no treasury state is consulted. Fails if the envelope
/// has the wrong length, the embedded key is not a valid curve point, or
/// the signature does not verify over `message`.
pub fn recover_signer(message: &[u8], envelope: &[u8]) -> Result<Address, SignatureError> {
    if envelope.len() != ENVELOPE_LEN {
        return Err(SignatureError::InvalidLength {
            expected: ENVELOPE_LEN,
            len: envelope.len(),
        });
    }

    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&envelope[..32]);
    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes.copy_from_slice(&envelope[32..]);
    let signature = Signature::from_bytes(&sig_bytes);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)?;

    Ok(Address::from_bytes(key_bytes))
}

/// Address derived from a signing key's verifying half.
pub fn signer_address(key: &SigningKey) -> Address {
    Address::from_bytes(key.verifying_key().to_bytes())
}

/// Produce a signature envelope over `message`.
///
/// Used by wallets and by the test suite; the engine itself only verifies.
pub fn sign_envelope(key: &SigningKey, message: &[u8]) -> [u8; ENVELOPE_LEN] {
    let mut envelope = [0u8; ENVELOPE_LEN];
    envelope[..32].copy_from_slice(&key.verifying_key().to_bytes());
    envelope[32..].copy_from_slice(&key.sign(message).to_bytes());
    envelope
}
