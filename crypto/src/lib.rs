//! Cryptographic layer for identity proofs.
//!
//! Proofs use armored Ed25519 envelopes: a hex body wrapped in
//! `-----BEGIN/END LINKPROOF ...-----` markers. A [`Keyring`] holds the
//! verifying keys imported from a claimant's armored key documents and
//! recovers the signed plaintext plus the signing key's fingerprint.

pub mod armor;
pub mod error;
pub mod fingerprint;
pub mod keyring;
pub mod sign;

pub use error::CryptoError;
pub use fingerprint::fingerprint_key;
pub use keyring::Keyring;
pub use sign::{export_public_key, generate_signing_key, sign_envelope, signature_body};
