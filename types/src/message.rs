//! Candidate messages as returned by the platform's message search.

use crate::ids::PlatformUserId;
use serde::{Deserialize, Serialize};

/// Where a message lives on the platform: conversation, sub-channel, message.
///
/// All three are opaque platform ids. Kept on every proof result so a
/// consumer can jump back to the original message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageCoordinates {
    pub conversation_id: String,
    pub channel_id: String,
    pub message_id: String,
}

/// One raw message transcript plus its coordinates and author.
///
/// Produced by the message-search collaborator; the pipeline only reads it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateMessage {
    pub coordinates: MessageCoordinates,
    pub author_id: PlatformUserId,
    pub content: String,
}
