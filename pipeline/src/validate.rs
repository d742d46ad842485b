//! Cross-validation of a verified payload against the query context.
//!
//! The signature being good only proves *someone* signed *something*.
//! These checks pin the something to this platform, this user, and this
//! external identity's own keys.

use crate::error::{MismatchKind, ProofError};
use crate::resolver::KeyringEntry;
use crate::verify::VerifiedPayload;
use linkproof_types::{ClaimFields, PlatformUserId};

/// Check that a recovered payload asserts exactly the identity link being
/// queried, signed by a key the claimed external identity publishes.
pub fn validate_claim(
    payload: &VerifiedPayload,
    claimed: &ClaimFields,
    platform_name: &str,
    queried_id: &PlatformUserId,
    entry: &KeyringEntry,
) -> Result<(), ProofError> {
    // A signature for some other linking scheme must not count here, even
    // if everything else lines up.
    if payload.fields.link_target != platform_name {
        return Err(ProofError::ClaimMismatch(MismatchKind::LinkTarget {
            found: payload.fields.link_target.clone(),
        }));
    }

    if payload.fields.platform_id != *queried_id {
        return Err(ProofError::ClaimMismatch(MismatchKind::PlatformId));
    }

    // A forged outer wrapper around a legitimately signed but unrelated
    // payload: the wrapper's own assertions must agree with the signed ones.
    if let Some(outer_id) = &claimed.platform_id {
        if *outer_id != payload.fields.platform_id {
            return Err(ProofError::ClaimMismatch(MismatchKind::OuterPlatformId));
        }
    }

    if payload.fields.external_username != claimed.external_username {
        return Err(ProofError::ClaimMismatch(MismatchKind::ExternalUsername));
    }

    // Replay defense: the signing key must be one the claimed identity
    // currently publishes, not just any key that happened to be in scope.
    if !entry.fingerprints.contains(&payload.signing_fingerprint) {
        return Err(ProofError::ClaimMismatch(MismatchKind::ForeignKey));
    }

    Ok(())
}
