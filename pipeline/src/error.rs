use thiserror::Error;

/// Which cross-check a claim failed, kept for diagnostics — a consumer
/// should be able to tell "signed for another platform" from "wrong user".
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MismatchKind {
    #[error("payload was signed for linking scheme {found:?}, not this platform")]
    LinkTarget { found: String },

    #[error("payload's platform id does not match the queried user")]
    PlatformId,

    #[error("outer claim asserts a different platform id than the signed payload")]
    OuterPlatformId,

    #[error("signed payload names a different external username than the claim")]
    ExternalUsername,

    #[error("signing key does not belong to the claimed external identity")]
    ForeignKey,
}

/// Errors produced by the proof verification pipeline.
///
/// Per-candidate errors are recorded on that candidate's `ProofResult` and
/// never abort sibling candidates. Only `AllProofsFailed` reaches the
/// caller, and only when the aggregation policy runs in strict mode.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("message contains no proof (fewer than two fenced blocks)")]
    NoProofFound,

    #[error("malformed claim: {0}")]
    MalformedClaim(String),

    #[error("key fetch failed: {0}")]
    KeyFetchFailed(String),

    #[error("signature did not verify against the claimant's keys")]
    SignatureInvalid,

    #[error("verification error: {0}")]
    VerificationError(String),

    #[error("claim mismatch: {0}")]
    ClaimMismatch(MismatchKind),

    #[error("all {} candidate proofs failed", .0.len())]
    AllProofsFailed(Vec<ProofError>),
}
