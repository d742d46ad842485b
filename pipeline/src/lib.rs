//! Identity proof verification pipeline.
//!
//! Given a platform user id, the pipeline searches the designated proof
//! channel for that user's messages, extracts the signed claim from each,
//! fetches the claimant's public keys (once per external username per
//! run), verifies signatures, cross-validates the claimed fields, and
//! classifies every candidate as valid, invalid with a reason, or a
//! duplicate of an earlier valid proof for the same identity pair.
//!
//! Candidates are verified concurrently under a configurable bound; one
//! failing or slow candidate never blocks the rest. The pipeline holds no
//! state across runs.

pub mod capabilities;
pub mod config;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod http;
pub mod logging;
pub mod outcome;
pub mod pipeline;
pub mod resolver;
pub mod validate;
pub mod verify;

pub use capabilities::{KeySource, MessageSearch};
pub use config::{ConfigError, PipelineConfig, SearchScope};
pub use error::{MismatchKind, ProofError};
pub use http::HttpKeySource;
pub use outcome::ProofResult;
pub use pipeline::ProofPipeline;
pub use resolver::{KeyResolver, KeyringEntry};
pub use verify::VerifiedPayload;
