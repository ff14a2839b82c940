//! JSON frames exchanged over the signaling WebSocket.
//!
//! Frames are adjacently tagged: `{"type": "join-room", "payload": {"roomId": "r1"}}`.
//! Signal, drawing and chat payloads are opaque [`serde_json::Value`]s; the
//! relay never looks inside them.

use crate::model::{IceServerConfig, MembershipEvent, MembershipKind, PeerId, RoomId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    JoinRoom { room_id: RoomId },
    LeaveRoom { room_id: RoomId },
    Signal { recipient: PeerId, payload: Value },
    Draw { room_id: RoomId, payload: Value },
    ClearCanvas { room_id: RoomId },
    ChatMessage { room_id: RoomId, message: Value },
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// First frame on every connection.
    Welcome { peer_id: PeerId },
    IceConfig { ice_servers: Vec<IceServerConfig> },
    /// Acknowledges `join-room` to the joiner itself.
    RoomJoined { room_id: RoomId, member_count: usize },
    RoomLeft { room_id: RoomId },
    UserJoined {
        room_id: RoomId,
        user_id: PeerId,
        user_count: usize,
    },
    UserLeft {
        room_id: RoomId,
        user_id: PeerId,
        user_count: usize,
    },
    Signal { sender: PeerId, payload: Value },
    Draw { payload: Value },
    ClearCanvas,
    ChatMessage { message: Value },
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The membership event carried by a `user-joined` / `user-left` frame.
    pub fn membership(&self) -> Option<MembershipEvent> {
        match self {
            Self::UserJoined {
                room_id,
                user_id,
                user_count,
            } => Some(MembershipEvent::joined(room_id.clone(), *user_id, *user_count)),
            Self::UserLeft {
                room_id,
                user_id,
                user_count,
            } => Some(MembershipEvent::left(room_id.clone(), *user_id, *user_count)),
            _ => None,
        }
    }
}

impl From<MembershipEvent> for ServerMessage {
    fn from(event: MembershipEvent) -> Self {
        let MembershipEvent {
            room_id,
            subject,
            kind,
            member_count,
        } = event;
        match kind {
            MembershipKind::Joined => Self::UserJoined {
                room_id,
                user_id: subject,
                user_count: member_count,
            },
            MembershipKind::Left => Self::UserLeft {
                room_id,
                user_id: subject,
                user_count: member_count,
            },
        }
    }
}
