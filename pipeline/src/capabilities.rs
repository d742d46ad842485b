//! Capability traits for the pipeline's two external collaborators.
//!
//! The pipeline does not talk to the platform or the identity provider
//! directly — it is handed a message-search capability and a key-fetch
//! capability. Timeouts and cancellation are the capability's concern;
//! a failed or cancelled call resolves that candidate, never the batch.

use crate::config::SearchScope;
use crate::error::ProofError;
use async_trait::async_trait;
use linkproof_types::{CandidateMessage, ExternalUsername, PlatformUserId};

/// Searches the proof channel for messages authored by a platform user.
#[async_trait]
pub trait MessageSearch: Send + Sync {
    /// Zero results means zero candidates, not an error.
    async fn search_messages(
        &self,
        scope: &SearchScope,
        author: &PlatformUserId,
    ) -> Result<Vec<CandidateMessage>, ProofError>;
}

/// Fetches the armored public-key documents an external identity
/// currently publishes.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Each returned document is one armored public-key export; the
    /// pipeline imports all of them into a single keyring.
    async fn fetch_key_documents(
        &self,
        username: &ExternalUsername,
    ) -> Result<Vec<String>, ProofError>;
}
