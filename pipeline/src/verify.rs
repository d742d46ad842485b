//! Signature verification step.
//!
//! Wraps the transcript's bare signature body into a full armored
//! envelope, checks it against the claimant's keyring, and parses the
//! recovered plaintext. Whether the signing key actually belongs to the
//! claimed identity is the validator's question, not this one's.

use crate::error::ProofError;
use linkproof_crypto::{armor, CryptoError, Keyring};
use linkproof_types::{ExtractedClaim, Fingerprint, PayloadFields};

/// A successfully recovered and parsed signed payload. Transient —
/// exists only between the verifier and validator steps.
#[derive(Clone, Debug)]
pub struct VerifiedPayload {
    /// Fingerprint of the key that produced the signature.
    pub signing_fingerprint: Fingerprint,
    pub fields: PayloadFields,
}

/// Verify a claim's signature and recover its payload.
pub fn verify_signature(
    claim: &ExtractedClaim,
    keyring: &Keyring,
) -> Result<VerifiedPayload, ProofError> {
    let envelope = armor::wrap_signature_body(&claim.signature_block);
    let (signing_fingerprint, plaintext) =
        keyring.verify_envelope(&envelope).map_err(|e| match e {
            CryptoError::SignatureInvalid => ProofError::SignatureInvalid,
            other => ProofError::VerificationError(other.to_string()),
        })?;

    let fields: PayloadFields = serde_json::from_slice(&plaintext)
        .map_err(|e| ProofError::MalformedClaim(format!("signed payload: {e}")))?;

    Ok(VerifiedPayload {
        signing_fingerprint,
        fields,
    })
}
