//! Run-scoped key resolution with per-username single-flight fetching.
//!
//! One resolver is created per pipeline run and dropped with it — key
//! material is never trusted across runs. Within a run, concurrent
//! candidates claiming the same external username share a single fetch:
//! the first caller fetches while holding that username's gate, followers
//! await the gate and read the cached outcome. Failed fetches are cached
//! too; retrying within a run would break the at-most-one-fetch guarantee.

use crate::capabilities::KeySource;
use crate::error::ProofError;
use linkproof_crypto::Keyring;
use linkproof_types::{ExternalUsername, Fingerprint};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cached verification material for one external username.
#[derive(Debug)]
pub struct KeyringEntry {
    /// Fingerprints of every key this identity currently publishes.
    pub fingerprints: HashSet<Fingerprint>,
    /// The keys themselves, ready for envelope verification.
    pub keyring: Keyring,
}

type CacheSlot = Arc<Mutex<Option<Result<Arc<KeyringEntry>, ProofError>>>>;

/// Resolves external usernames to keyrings, at most one fetch per
/// distinct username per pipeline run.
pub struct KeyResolver {
    source: Arc<dyn KeySource>,
    /// Per-username slots. The outer lock is held only long enough to
    /// hand out a slot; the fetch itself runs under the slot's own lock.
    cache: Mutex<HashMap<ExternalUsername, CacheSlot>>,
}

impl KeyResolver {
    pub fn new(source: Arc<dyn KeySource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a username to its keyring entry, fetching on first use.
    pub async fn resolve(
        &self,
        username: &ExternalUsername,
    ) -> Result<Arc<KeyringEntry>, ProofError> {
        let slot = {
            let mut cache = self.cache.lock().await;
            cache
                .entry(username.clone())
                .or_insert_with(|| Arc::new(Mutex::new(None)))
                .clone()
        };

        let mut guard = slot.lock().await;
        if let Some(cached) = guard.as_ref() {
            tracing::debug!(username = %username, "keyring cache hit");
            return cached.clone();
        }

        let outcome = self.fetch_entry(username).await.map(Arc::new);
        if let Err(err) = &outcome {
            tracing::warn!(username = %username, error = %err, "key resolution failed");
        }
        *guard = Some(outcome.clone());
        outcome
    }

    async fn fetch_entry(&self, username: &ExternalUsername) -> Result<KeyringEntry, ProofError> {
        let documents = self.source.fetch_key_documents(username).await?;
        if documents.is_empty() {
            return Err(ProofError::KeyFetchFailed(format!(
                "provider returned no key documents for {username}"
            )));
        }

        let mut keyring = Keyring::new();
        let mut fingerprints = HashSet::new();
        let mut last_import_error = None;
        for document in &documents {
            match keyring.import_armored(document) {
                Ok(fp) => {
                    fingerprints.insert(fp);
                }
                Err(e) => {
                    tracing::warn!(username = %username, error = %e, "skipping unusable key document");
                    last_import_error = Some(e);
                }
            }
        }

        if keyring.is_empty() {
            let detail = last_import_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no documents".into());
            return Err(ProofError::KeyFetchFailed(format!(
                "no usable key material for {username}: {detail}"
            )));
        }

        tracing::debug!(
            username = %username,
            keys = keyring.len(),
            "imported keyring"
        );
        Ok(KeyringEntry {
            fingerprints,
            keyring,
        })
    }
}
