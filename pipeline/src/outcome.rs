//! Per-candidate verification outcomes.

use crate::error::ProofError;
use linkproof_types::{ExternalUsername, Fingerprint, MessageCoordinates, PlatformUserId};

/// The classified outcome for one candidate proof message.
///
/// Created once per candidate; the dedup pass may later set `duplicate`
/// and `position_hint`, nothing else mutates it. `error` is set exactly
/// when `valid` is false. `external_username` is `None` only when the
/// candidate failed before a claim could be extracted.
#[derive(Clone, Debug)]
pub struct ProofResult {
    pub source: MessageCoordinates,
    pub external_username: Option<ExternalUsername>,
    pub platform_id: PlatformUserId,
    pub valid: bool,
    pub duplicate: bool,
    pub fingerprint: Option<Fingerprint>,
    pub error: Option<ProofError>,
    /// Display-order hint among reportable results, assigned by the
    /// dedup pass.
    pub position_hint: Option<usize>,
}

impl ProofResult {
    pub(crate) fn accepted(
        source: MessageCoordinates,
        external_username: ExternalUsername,
        platform_id: PlatformUserId,
        fingerprint: Fingerprint,
    ) -> Self {
        Self {
            source,
            external_username: Some(external_username),
            platform_id,
            valid: true,
            duplicate: false,
            fingerprint: Some(fingerprint),
            error: None,
            position_hint: None,
        }
    }

    pub(crate) fn rejected(
        source: MessageCoordinates,
        external_username: Option<ExternalUsername>,
        platform_id: PlatformUserId,
        error: ProofError,
    ) -> Self {
        Self {
            source,
            external_username,
            platform_id,
            valid: false,
            duplicate: false,
            fingerprint: None,
            error: Some(error),
            position_hint: None,
        }
    }

    /// Valid and not displaced by an earlier proof of the same link.
    pub fn is_reportable(&self) -> bool {
        self.valid && !self.duplicate
    }

    /// The dedup grouping key: one identity link.
    pub(crate) fn identity_pair(&self) -> Option<(&ExternalUsername, &PlatformUserId)> {
        self.external_username
            .as_ref()
            .map(|username| (username, &self.platform_id))
    }
}
