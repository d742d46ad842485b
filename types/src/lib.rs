//! Core data types for identity proof verification.
//!
//! This crate defines the types shared across the linkproof workspace:
//! platform/external identifiers, message coordinates, candidate messages,
//! and the claim schemas carried inside signed proofs. No I/O, no crypto.

pub mod claim;
pub mod ids;
pub mod message;

pub use claim::{ClaimFields, ExtractedClaim, PayloadFields};
pub use ids::{ExternalUsername, Fingerprint, PlatformUserId};
pub use message::{CandidateMessage, MessageCoordinates};
