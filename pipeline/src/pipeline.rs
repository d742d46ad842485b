//! The pipeline orchestrator: search, per-candidate verification with
//! bounded concurrency, stable-order collection, dedup policy.

use crate::capabilities::{KeySource, MessageSearch};
use crate::config::PipelineConfig;
use crate::dedup;
use crate::error::ProofError;
use crate::extract;
use crate::outcome::ProofResult;
use crate::resolver::KeyResolver;
use crate::validate;
use crate::verify;
use linkproof_types::{CandidateMessage, PlatformUserId};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Verifies identity proofs for platform users.
///
/// One pipeline can serve many queries; each query is an independent run
/// with its own key cache. The two capabilities are the pipeline's only
/// view of the outside world.
pub struct ProofPipeline {
    search: Arc<dyn MessageSearch>,
    keys: Arc<dyn KeySource>,
    config: PipelineConfig,
}

impl ProofPipeline {
    pub fn new(
        search: Arc<dyn MessageSearch>,
        keys: Arc<dyn KeySource>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            search,
            keys,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The full classified set of proofs for one platform user, in stable
    /// candidate order.
    ///
    /// Individual candidate failures are recorded on their results; the
    /// call itself only fails with [`ProofError::AllProofsFailed`] (strict
    /// mode, nothing usable) or a search capability error.
    pub async fn proofs_for(
        &self,
        platform_id: &PlatformUserId,
    ) -> Result<Vec<ProofResult>, ProofError> {
        let candidates = self
            .search
            .search_messages(&self.config.scope, platform_id)
            .await?;
        tracing::debug!(
            user = %platform_id,
            candidates = candidates.len(),
            "collected candidate proof messages"
        );

        let resolver = Arc::new(KeyResolver::new(Arc::clone(&self.keys)));
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));

        let mut handles = Vec::with_capacity(candidates.len());
        for message in candidates {
            let source = message.coordinates.clone();
            let resolver = Arc::clone(&resolver);
            let semaphore = Arc::clone(&semaphore);
            let queried_id = platform_id.clone();
            let platform_name = self.config.platform_name.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.unwrap();
                verify_candidate(message, &queried_id, &platform_name, &resolver).await
            });
            handles.push((source, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (source, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                // A cancelled or panicked candidate must not hang or sink
                // the batch; it becomes a recorded failure.
                Err(join_error) => {
                    tracing::warn!(error = %join_error, "candidate task did not complete");
                    results.push(ProofResult::rejected(
                        source,
                        None,
                        platform_id.clone(),
                        ProofError::VerificationError(join_error.to_string()),
                    ));
                }
            }
        }

        dedup::apply_policy(&mut results, &self.config)?;
        Ok(results)
    }

    /// Only the currently-valid, non-duplicate proofs for one platform user.
    pub async fn valid_proofs_for(
        &self,
        platform_id: &PlatformUserId,
    ) -> Result<Vec<ProofResult>, ProofError> {
        let results = self.proofs_for(platform_id).await?;
        Ok(results.into_iter().filter(|r| r.is_reportable()).collect())
    }
}

/// Run one candidate through extraction, key resolution, signature
/// verification, and cross-validation. Never fails the batch — every
/// outcome is a `ProofResult`.
async fn verify_candidate(
    message: CandidateMessage,
    queried_id: &PlatformUserId,
    platform_name: &str,
    resolver: &KeyResolver,
) -> ProofResult {
    let source = message.coordinates.clone();

    let claim = match extract::extract_claim(&message) {
        Ok(claim) => claim,
        Err(error) => {
            tracing::debug!(message = %source.message_id, error = %error, "extraction failed");
            return ProofResult::rejected(source, None, queried_id.clone(), error);
        }
    };
    let claimed_username = claim.fields.external_username.clone();

    let entry = match resolver.resolve(&claimed_username).await {
        Ok(entry) => entry,
        Err(error) => {
            return ProofResult::rejected(
                source,
                Some(claimed_username),
                queried_id.clone(),
                error,
            );
        }
    };

    let payload = match verify::verify_signature(&claim, &entry.keyring) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(
                message = %source.message_id,
                username = %claimed_username,
                error = %error,
                "signature verification failed"
            );
            return ProofResult::rejected(
                source,
                Some(claimed_username),
                queried_id.clone(),
                error,
            );
        }
    };

    if let Err(error) = validate::validate_claim(
        &payload,
        &claim.fields,
        platform_name,
        queried_id,
        &entry,
    ) {
        tracing::warn!(
            message = %source.message_id,
            username = %claimed_username,
            error = %error,
            "claim validation failed"
        );
        return ProofResult::rejected(source, Some(claimed_username), queried_id.clone(), error);
    }

    tracing::debug!(
        message = %source.message_id,
        username = %claimed_username,
        fingerprint = %payload.signing_fingerprint,
        "proof verified"
    );
    ProofResult::accepted(
        source,
        payload.fields.external_username,
        queried_id.clone(),
        payload.signing_fingerprint,
    )
}
