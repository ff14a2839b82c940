use meshroom_core::{IceServerConfig, PeerId, RoomId, ServerMessage};
use serde_json::Value;

/// What the controller tells the UI layer.
#[derive(Debug, Clone)]
pub enum MeshEvent<S> {
    Identity(PeerId),
    IceServers(Vec<IceServerConfig>),
    RoomJoined {
        room_id: RoomId,
        member_count: usize,
    },
    MemberCount(usize),
    RemoteStreamAvailable {
        remote: PeerId,
        stream: S,
    },
    RemoteStreamRemoved {
        remote: PeerId,
    },
    LinkFailed {
        remote: PeerId,
        reason: String,
    },
    /// Local capture failed. The room is still joined; no links are built.
    MediaUnavailable {
        reason: String,
    },
    LocalMediaChanged {
        audio: bool,
        video: bool,
    },
    Draw(Value),
    ClearCanvas,
    Chat(Value),
    RoomLeft {
        room_id: RoomId,
    },
    Disconnected,
}

/// Requests from the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshCommand {
    JoinRoom(RoomId),
    LeaveRoom,
    ToggleAudio(bool),
    ToggleVideo(bool),
    Draw(Value),
    ClearCanvas,
    Chat(Value),
    Shutdown,
}

/// Everything that goes through the controller inbox, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshInput {
    Server(ServerMessage),
    Command(MeshCommand),
    /// The relay connection is gone.
    Disconnected,
}

impl From<MeshCommand> for MeshInput {
    fn from(command: MeshCommand) -> Self {
        Self::Command(command)
    }
}

impl From<ServerMessage> for MeshInput {
    fn from(msg: ServerMessage) -> Self {
        Self::Server(msg)
    }
}
