//! Claim extraction from raw message transcripts.
//!
//! A proof message carries at least two fenced blocks; the last two are
//! (claim object, signature body) in that order. Anything before them is
//! free commentary and ignored. This convention is a compatibility
//! contract with already-posted proofs — do not change it.

use crate::error::ProofError;
use linkproof_types::{CandidateMessage, ClaimFields, ExtractedClaim};

/// Fence marker delimiting a block.
const FENCE: &str = "```";

/// All fenced blocks in the transcript, trimmed, in document order.
/// Whitespace-only blocks do not count.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    loop {
        let Some(open) = rest.find(FENCE) else { break };
        let after_open = &rest[open + FENCE.len()..];
        let Some(close) = after_open.find(FENCE) else { break };
        let content = after_open[..close].trim();
        if !content.is_empty() {
            blocks.push(content);
        }
        rest = &after_open[close + FENCE.len()..];
    }
    blocks
}

/// Parse one candidate message into a structured claim.
///
/// Fails with [`ProofError::NoProofFound`] when fewer than two fenced
/// blocks exist, and [`ProofError::MalformedClaim`] when the claim block
/// is not valid claim JSON. No network, no crypto.
pub fn extract_claim(message: &CandidateMessage) -> Result<ExtractedClaim, ProofError> {
    let blocks = fenced_blocks(&message.content);
    if blocks.len() < 2 {
        return Err(ProofError::NoProofFound);
    }

    let signature_block = blocks[blocks.len() - 1];
    let claim_block = blocks[blocks.len() - 2];

    let fields: ClaimFields = serde_json::from_str(claim_block)
        .map_err(|e| ProofError::MalformedClaim(e.to_string()))?;

    Ok(ExtractedClaim {
        fields,
        signature_block: signature_block.to_string(),
        source: message.coordinates.clone(),
    })
}
