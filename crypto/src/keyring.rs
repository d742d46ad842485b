//! A collection of verifying keys checked against signed envelopes.

use crate::armor;
use crate::error::CryptoError;
use crate::fingerprint::fingerprint_key;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use linkproof_types::Fingerprint;

/// Verification keyring: every key a claimant currently publishes.
///
/// Built fresh per external identity from its armored key documents;
/// never persisted.
#[derive(Debug, Default)]
pub struct Keyring {
    keys: Vec<(Fingerprint, VerifyingKey)>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import one armored public-key document, returning its fingerprint.
    pub fn import_armored(&mut self, document: &str) -> Result<Fingerprint, CryptoError> {
        let bytes = armor::dearmor(armor::PUBLIC_KEY, document)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())))?;
        let key = VerifyingKey::from_bytes(&arr)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let fp = fingerprint_key(&key);
        self.keys.push((fp.clone(), key));
        Ok(fp)
    }

    /// Fingerprints of every key in the ring, in import order.
    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        self.keys.iter().map(|(fp, _)| fp.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Verify a fully armored signed envelope against every key in the ring.
    ///
    /// On success returns the fingerprint of the key that actually signed,
    /// plus the recovered plaintext payload. The caller decides whether that
    /// fingerprint belongs to the claimed identity — this layer only answers
    /// "did someone in this ring sign these bytes".
    pub fn verify_envelope(&self, armored: &str) -> Result<(Fingerprint, Vec<u8>), CryptoError> {
        let bytes = armor::dearmor(armor::SIGNED_MESSAGE, armored)?;
        if bytes.len() < 64 {
            return Err(CryptoError::TruncatedEnvelope(bytes.len()));
        }

        let (payload, sig_bytes) = bytes.split_at(bytes.len() - 64);
        let signature = Signature::from_slice(sig_bytes)
            .map_err(|e| CryptoError::MalformedArmor(format!("signature bytes: {e}")))?;

        for (fp, key) in &self.keys {
            if key.verify(payload, &signature).is_ok() {
                return Ok((fp.clone(), payload.to_vec()));
            }
        }

        Err(CryptoError::SignatureInvalid)
    }
}
