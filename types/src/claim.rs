//! Claim schemas: the outer claim object posted next to a signature, and
//! the payload recovered from inside the signed envelope.
//!
//! Both are parsed strictly from untrusted JSON — required fields must be
//! present with the right types. Unknown extra fields are tolerated so
//! proof authors can annotate their claims.

use crate::ids::{ExternalUsername, PlatformUserId};
use crate::message::MessageCoordinates;
use serde::{Deserialize, Serialize};

/// The outer claim object: second-to-last fenced block of a proof message.
///
/// `platform_id` is optional here — some proof authors only assert it
/// inside the signed payload. When present it must agree with the payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFields {
    /// Name of the external identity provider the claim points at.
    pub provider: String,
    /// The claimed username on that provider.
    pub external_username: ExternalUsername,
    /// Optionally, the platform user id the author claims to be.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<PlatformUserId>,
}

/// The plaintext recovered from a verified signature envelope.
///
/// Unlike [`ClaimFields`], every field here is required: this is the part
/// the external identity actually signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadFields {
    /// Which platform this proof was created for. A payload signed for a
    /// different linking scheme must be rejected even if the signature is
    /// good.
    pub link_target: String,
    /// The platform user id the signer asserts ownership of.
    pub platform_id: PlatformUserId,
    /// The signer's username on the external provider.
    pub external_username: ExternalUsername,
}

/// Output of the claim extractor: structured claim + detached signature
/// body, plus where the message came from. Created per candidate message
/// and discarded after verification.
#[derive(Clone, Debug)]
pub struct ExtractedClaim {
    pub fields: ClaimFields,
    pub signature_block: String,
    pub source: MessageCoordinates,
}
