//! Key fingerprints: Blake2b-256 of the public key bytes, hex-encoded.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::VerifyingKey;
use linkproof_types::Fingerprint;

type Blake2b256 = Blake2b<U32>;

/// Compute the fingerprint of a verifying key.
pub fn fingerprint_key(key: &VerifyingKey) -> Fingerprint {
    let mut hasher = Blake2b256::new();
    hasher.update(key.as_bytes());
    Fingerprint::new(hex::encode(hasher.finalize()))
}
