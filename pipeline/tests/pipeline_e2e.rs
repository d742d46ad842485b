//! End-to-end pipeline scenarios against stub capabilities.

use async_trait::async_trait;
use linkproof_crypto::{export_public_key, fingerprint_key, generate_signing_key, signature_body};
use linkproof_pipeline::{
    KeySource, MessageSearch, PipelineConfig, ProofError, ProofPipeline, ProofResult, SearchScope,
};
use linkproof_pipeline::error::MismatchKind;
use linkproof_types::{
    CandidateMessage, ClaimFields, ExternalUsername, MessageCoordinates, PayloadFields,
    PlatformUserId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PLATFORM: &str = "chatnet";

// ── Stub capabilities ───────────────────────────────────────────────

struct StubSearch {
    messages: Vec<CandidateMessage>,
}

#[async_trait]
impl MessageSearch for StubSearch {
    async fn search_messages(
        &self,
        _scope: &SearchScope,
        author: &PlatformUserId,
    ) -> Result<Vec<CandidateMessage>, ProofError> {
        Ok(self
            .messages
            .iter()
            .filter(|m| m.author_id == *author)
            .cloned()
            .collect())
    }
}

struct StubKeys {
    /// username -> served armored key documents
    keys: HashMap<String, Vec<String>>,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
    unreachable: bool,
}

impl StubKeys {
    fn serving(keys: HashMap<String, Vec<String>>) -> Self {
        Self {
            keys,
            fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::ZERO,
            unreachable: false,
        }
    }

    fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::serving(HashMap::new())
        }
    }
}

#[async_trait]
impl KeySource for StubKeys {
    async fn fetch_key_documents(
        &self,
        username: &ExternalUsername,
    ) -> Result<Vec<String>, ProofError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.unreachable {
            return Err(ProofError::KeyFetchFailed("provider unreachable".into()));
        }
        self.keys
            .get(username.as_str())
            .cloned()
            .ok_or_else(|| ProofError::KeyFetchFailed(format!("unknown user {username}")))
    }
}

// ── Fixture helpers ─────────────────────────────────────────────────

fn coordinates(message_id: &str) -> MessageCoordinates {
    MessageCoordinates {
        conversation_id: "conv".into(),
        channel_id: "proofs".into(),
        message_id: message_id.into(),
    }
}

fn scope() -> SearchScope {
    SearchScope {
        conversation_id: "conv".into(),
        channel_id: "proofs".into(),
    }
}

fn config() -> PipelineConfig {
    PipelineConfig::new(PLATFORM, scope())
}

fn payload_json(link_target: &str, platform_id: &str, username: &str) -> Vec<u8> {
    serde_json::to_vec(&PayloadFields {
        link_target: link_target.into(),
        platform_id: PlatformUserId::new(platform_id),
        external_username: ExternalUsername::new(username),
    })
    .unwrap()
}

fn claim_json(username: &str, platform_id: Option<&str>) -> String {
    serde_json::to_string(&ClaimFields {
        provider: "keyproof".into(),
        external_username: ExternalUsername::new(username),
        platform_id: platform_id.map(PlatformUserId::new),
    })
    .unwrap()
}

fn proof_message(message_id: &str, author: &str, claim: &str, signature: &str) -> CandidateMessage {
    CandidateMessage {
        coordinates: coordinates(message_id),
        author_id: PlatformUserId::new(author),
        content: format!("Linking my accounts.\n```\n{claim}\n```\n```\n{signature}\n```"),
    }
}

/// A signer plus the key documents its identity publishes.
struct Identity {
    key: ed25519_dalek::SigningKey,
    username: String,
}

impl Identity {
    fn new(username: &str) -> Self {
        Self {
            key: generate_signing_key(),
            username: username.into(),
        }
    }

    fn documents(&self) -> (String, Vec<String>) {
        (
            self.username.clone(),
            vec![export_public_key(&self.key.verifying_key())],
        )
    }

    /// A fully well-formed proof message for the given platform user.
    fn proof(&self, message_id: &str, platform_id: &str) -> CandidateMessage {
        let payload = payload_json(PLATFORM, platform_id, &self.username);
        proof_message(
            message_id,
            platform_id,
            &claim_json(&self.username, Some(platform_id)),
            &signature_body(&payload, &self.key),
        )
    }
}

fn pipeline(messages: Vec<CandidateMessage>, keys: Arc<StubKeys>, config: PipelineConfig) -> ProofPipeline {
    ProofPipeline::new(
        Arc::new(StubSearch { messages }),
        keys as Arc<dyn KeySource>,
        config,
    )
}

fn reportable(results: &[ProofResult]) -> Vec<&ProofResult> {
    results.iter().filter(|r| r.is_reportable()).collect()
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn single_valid_proof_verifies() {
    let alice = Identity::new("alice");
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    let pipeline = pipeline(vec![alice.proof("m1", "42")], keys, config());

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.valid);
    assert!(!result.duplicate);
    assert!(result.error.is_none());
    assert_eq!(result.external_username.as_ref().unwrap().as_str(), "alice");
    assert_eq!(
        result.fingerprint.as_ref().unwrap(),
        &fingerprint_key(&alice.key.verifying_key())
    );
    assert_eq!(result.position_hint, Some(0));
}

#[tokio::test]
async fn payload_for_other_user_is_claim_mismatch() {
    let alice = Identity::new("alice");
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    // Signed payload asserts platform user 7; the message author (and the
    // queried id) is 42.
    let payload = payload_json(PLATFORM, "7", "alice");
    let message = proof_message(
        "m1",
        "42",
        &claim_json("alice", None),
        &signature_body(&payload, &alice.key),
    );
    let pipeline = pipeline(vec![message], keys, config());

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(!results[0].valid);
    assert_eq!(
        results[0].error,
        Some(ProofError::ClaimMismatch(MismatchKind::PlatformId))
    );
}

#[tokio::test]
async fn duplicate_proofs_keep_earliest() {
    let alice = Identity::new("alice");
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    let pipeline = pipeline(
        vec![alice.proof("m1", "42"), alice.proof("m2", "42")],
        Arc::clone(&keys),
        config(),
    );

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].source.message_id, "m1");
    assert!(results[0].valid && !results[0].duplicate);
    assert!(results[1].valid && results[1].duplicate);

    let valid_only = pipeline
        .valid_proofs_for(&PlatformUserId::new("42"))
        .await
        .unwrap();
    assert_eq!(valid_only.len(), 1);
    assert_eq!(valid_only[0].source.message_id, "m1");
}

#[tokio::test]
async fn unreachable_provider_lenient_and_strict() {
    let alice = Identity::new("alice");

    // Lenient (default): the failure stays on the result.
    let pipeline_lenient = pipeline(
        vec![alice.proof("m1", "42")],
        Arc::new(StubKeys::unreachable()),
        config(),
    );
    let results = pipeline_lenient
        .proofs_for(&PlatformUserId::new("42"))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0].error,
        Some(ProofError::KeyFetchFailed(_))
    ));
    let valid_only = pipeline_lenient
        .valid_proofs_for(&PlatformUserId::new("42"))
        .await
        .unwrap();
    assert!(valid_only.is_empty());

    // Strict: the whole call fails and carries the individual errors.
    let mut strict = config();
    strict.suppress_errors = false;
    let pipeline_strict = pipeline(
        vec![alice.proof("m1", "42")],
        Arc::new(StubKeys::unreachable()),
        strict,
    );
    let err = pipeline_strict
        .proofs_for(&PlatformUserId::new("42"))
        .await
        .unwrap_err();
    match err {
        ProofError::AllProofsFailed(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(errors[0], ProofError::KeyFetchFailed(_)));
        }
        other => panic!("expected AllProofsFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn one_fetch_per_username_across_candidates() {
    let alice = Identity::new("alice");
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    let pipeline = pipeline(
        vec![
            alice.proof("m1", "42"),
            alice.proof("m2", "42"),
            alice.proof("m3", "42"),
        ],
        Arc::clone(&keys),
        config(),
    );

    pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(keys.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rerun_yields_identical_classification() {
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");
    let keys = Arc::new(StubKeys::serving(HashMap::from([
        alice.documents(),
        bob.documents(),
    ])));
    let pipeline = pipeline(
        vec![
            alice.proof("m1", "42"),
            bob.proof("m2", "42"),
            alice.proof("m3", "42"),
        ],
        Arc::clone(&keys),
        config(),
    );

    let first = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    let second = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.source, b.source);
        assert_eq!(a.valid, b.valid);
        assert_eq!(a.duplicate, b.duplicate);
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.position_hint, b.position_hint);
    }
    // Each run resolves keys fresh — two runs, two usernames each.
    assert_eq!(keys.fetches.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn message_without_blocks_is_recorded_failure() {
    let alice = Identity::new("alice");
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    let chatter = CandidateMessage {
        coordinates: coordinates("m1"),
        author_id: PlatformUserId::new("42"),
        content: "hello, no proof here".into(),
    };
    let pipeline = pipeline(vec![chatter, alice.proof("m2", "42")], keys, config());

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].error, Some(ProofError::NoProofFound));
    assert!(results[0].external_username.is_none());
    assert!(results[1].valid);
}

#[tokio::test]
async fn zero_candidates_is_empty_not_an_error() {
    let mut strict = config();
    strict.suppress_errors = false;
    let pipeline = pipeline(Vec::new(), Arc::new(StubKeys::unreachable()), strict);

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn payload_signed_for_other_scheme_rejected() {
    let alice = Identity::new("alice");
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    let payload = payload_json("othernet", "42", "alice");
    let message = proof_message(
        "m1",
        "42",
        &claim_json("alice", None),
        &signature_body(&payload, &alice.key),
    );
    let pipeline = pipeline(vec![message], keys, config());

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(
        results[0].error,
        Some(ProofError::ClaimMismatch(MismatchKind::LinkTarget {
            found: "othernet".into()
        }))
    );
}

#[tokio::test]
async fn forged_outer_wrapper_rejected() {
    let alice = Identity::new("alice");
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    // Legitimate signed payload for user 42, but the outer wrapper claims
    // a different platform id.
    let payload = payload_json(PLATFORM, "42", "alice");
    let message = proof_message(
        "m1",
        "42",
        &claim_json("alice", Some("999")),
        &signature_body(&payload, &alice.key),
    );
    let pipeline = pipeline(vec![message], keys, config());

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(
        results[0].error,
        Some(ProofError::ClaimMismatch(MismatchKind::OuterPlatformId))
    );
}

#[tokio::test]
async fn signature_by_unpublished_key_rejected() {
    let alice = Identity::new("alice");
    let mallory = Identity::new("mallory");
    // Alice's published keys do not include the key that signed.
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    let payload = payload_json(PLATFORM, "42", "alice");
    let message = proof_message(
        "m1",
        "42",
        &claim_json("alice", None),
        &signature_body(&payload, &mallory.key),
    );
    let pipeline = pipeline(vec![message], keys, config());

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(results[0].error, Some(ProofError::SignatureInvalid));
}

#[tokio::test]
async fn deduplicate_off_reports_both_valid() {
    let alice = Identity::new("alice");
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    let mut cfg = config();
    cfg.deduplicate = false;
    let pipeline = pipeline(
        vec![alice.proof("m1", "42"), alice.proof("m2", "42")],
        keys,
        cfg,
    );

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(reportable(&results).len(), 2);
}

#[tokio::test]
async fn failed_candidate_does_not_abort_siblings() {
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");
    // Bob's keys are not served: his candidate fails, Alice's verifies.
    let keys = Arc::new(StubKeys::serving(HashMap::from([alice.documents()])));
    let pipeline = pipeline(
        vec![bob.proof("m1", "42"), alice.proof("m2", "42")],
        keys,
        config(),
    );

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(matches!(
        results[0].error,
        Some(ProofError::KeyFetchFailed(_))
    ));
    assert!(results[1].valid);
}

#[tokio::test]
async fn concurrency_stays_under_the_bound() {
    // Eight distinct identities so every candidate needs its own fetch.
    let identities: Vec<Identity> = (0..8)
        .map(|i| Identity::new(&format!("user{i}")))
        .collect();
    let mut served = HashMap::new();
    let mut messages = Vec::new();
    for (i, identity) in identities.iter().enumerate() {
        let (username, documents) = identity.documents();
        served.insert(username, documents);
        messages.push(identity.proof(&format!("m{i}"), "42"));
    }

    let keys = Arc::new(StubKeys {
        delay: Duration::from_millis(25),
        ..StubKeys::serving(served)
    });
    let mut cfg = config();
    cfg.max_concurrent = 2;
    let pipeline = pipeline(messages, Arc::clone(&keys), cfg);

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    assert_eq!(results.iter().filter(|r| r.valid).count(), 8);
    assert!(
        keys.max_in_flight.load(Ordering::SeqCst) <= 2,
        "expected at most 2 concurrent fetches, saw {}",
        keys.max_in_flight.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn results_keep_stable_candidate_order() {
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");
    let carol = Identity::new("carol");
    let keys = Arc::new(StubKeys::serving(HashMap::from([
        alice.documents(),
        bob.documents(),
        carol.documents(),
    ])));
    let pipeline = pipeline(
        vec![
            carol.proof("m1", "42"),
            alice.proof("m2", "42"),
            bob.proof("m3", "42"),
        ],
        keys,
        config(),
    );

    let results = pipeline.proofs_for(&PlatformUserId::new("42")).await.unwrap();
    let order: Vec<&str> = results.iter().map(|r| r.source.message_id.as_str()).collect();
    assert_eq!(order, vec!["m1", "m2", "m3"]);
}
