//! Duplicate marking and batch aggregation policy.
//!
//! A user can post the same proof more than once; only the earliest valid
//! posting of an identity pair counts, the rest are flagged so consumers
//! can skip them. Whether an all-failed batch is an error at all depends
//! on `suppress_errors`.

use crate::config::PipelineConfig;
use crate::error::ProofError;
use crate::outcome::ProofResult;
use linkproof_types::{ExternalUsername, PlatformUserId};
use std::collections::HashMap;

/// Apply the dedup and failure policy to a full batch, in scan order.
pub fn apply_policy(
    results: &mut [ProofResult],
    config: &PipelineConfig,
) -> Result<(), ProofError> {
    if config.deduplicate {
        mark_duplicates(results);
    }
    assign_position_hints(results);

    let any_reportable = results.iter().any(|r| r.is_reportable());
    if !any_reportable && !config.suppress_errors {
        let errors: Vec<ProofError> = results
            .iter()
            .filter_map(|r| r.error.clone())
            .collect();
        if !errors.is_empty() {
            return Err(ProofError::AllProofsFailed(errors));
        }
    }
    Ok(())
}

/// Within each `(external_username, platform_id)` group that has at least
/// one valid member, keep the earliest valid result and mark every other
/// member a duplicate. Groups with no valid member are untouched — failed
/// attempts are not deduplicated against each other.
fn mark_duplicates(results: &mut [ProofResult]) {
    let mut preferred: HashMap<(ExternalUsername, PlatformUserId), usize> = HashMap::new();
    for (index, result) in results.iter().enumerate() {
        if !result.valid {
            continue;
        }
        let Some((username, platform_id)) = result.identity_pair() else {
            continue;
        };
        preferred
            .entry((username.clone(), platform_id.clone()))
            .or_insert(index);
    }

    for (index, result) in results.iter_mut().enumerate() {
        let Some((username, platform_id)) = result.identity_pair() else {
            continue;
        };
        match preferred.get(&(username.clone(), platform_id.clone())) {
            Some(&kept) if kept != index => result.duplicate = true,
            _ => {}
        }
    }
}

/// Reportable results get their display ordinal; everything else keeps none.
fn assign_position_hints(results: &mut [ProofResult]) {
    let mut position = 0;
    for result in results.iter_mut() {
        if result.is_reportable() {
            result.position_hint = Some(position);
            position += 1;
        }
    }
}
