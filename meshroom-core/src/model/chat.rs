use serde::{Deserialize, Serialize};

/// Chat line as the bundled clients render it. The relay forwards the
/// `message` field of `chat-message` frames untouched, so other clients are
/// free to send any JSON there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: String,
    /// Milliseconds since the unix epoch.
    pub timestamp: u64,
}
