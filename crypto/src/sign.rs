//! Proof authoring: signing payloads into armored envelopes and exporting
//! public keys. The verification pipeline never signs; this side of the
//! scheme exists for proof-posting tooling and for tests.

use crate::armor;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

/// Generate a fresh Ed25519 signing key from a secure random source.
pub fn generate_signing_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

/// Export a verifying key as an armored key document.
pub fn export_public_key(key: &VerifyingKey) -> String {
    armor::armor(armor::PUBLIC_KEY, key.as_bytes())
}

/// Sign a payload into a fully armored envelope (payload || signature).
pub fn sign_envelope(payload: &[u8], key: &SigningKey) -> String {
    let sig = key.sign(payload);
    let mut bytes = payload.to_vec();
    bytes.extend_from_slice(&sig.to_bytes());
    armor::armor(armor::SIGNED_MESSAGE, &bytes)
}

/// The bare hex body of a signed envelope, as posted in a proof message's
/// signature block (armor headers stripped).
pub fn signature_body(payload: &[u8], key: &SigningKey) -> String {
    let sig = key.sign(payload);
    let mut bytes = payload.to_vec();
    bytes.extend_from_slice(&sig.to_bytes());
    hex::encode(bytes)
}
