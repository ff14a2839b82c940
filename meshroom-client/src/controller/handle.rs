use crate::controller::{MeshCommand, MeshInput};
use crate::error::{MeshError, MeshResult};
use meshroom_core::{RoomId, ServerMessage};
use serde_json::Value;
use tokio::sync::mpsc;

/// Cloneable sender into a running controller.
#[derive(Debug, Clone)]
pub struct MeshHandle {
    tx: mpsc::UnboundedSender<MeshInput>,
}

impl MeshHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<MeshInput>) -> Self {
        Self { tx }
    }

    pub fn send(&self, input: impl Into<MeshInput>) -> MeshResult<()> {
        self.tx
            .send(input.into())
            .map_err(|_| MeshError::ControllerGone)
    }

    pub fn server_frame(&self, msg: ServerMessage) -> MeshResult<()> {
        self.send(MeshInput::Server(msg))
    }

    pub fn disconnected(&self) -> MeshResult<()> {
        self.send(MeshInput::Disconnected)
    }

    pub fn join_room(&self, room_id: impl Into<RoomId>) -> MeshResult<()> {
        self.send(MeshCommand::JoinRoom(room_id.into()))
    }

    pub fn leave_room(&self) -> MeshResult<()> {
        self.send(MeshCommand::LeaveRoom)
    }

    pub fn toggle_audio(&self, enabled: bool) -> MeshResult<()> {
        self.send(MeshCommand::ToggleAudio(enabled))
    }

    pub fn toggle_video(&self, enabled: bool) -> MeshResult<()> {
        self.send(MeshCommand::ToggleVideo(enabled))
    }

    pub fn draw(&self, payload: Value) -> MeshResult<()> {
        self.send(MeshCommand::Draw(payload))
    }

    pub fn clear_canvas(&self) -> MeshResult<()> {
        self.send(MeshCommand::ClearCanvas)
    }

    pub fn chat(&self, message: Value) -> MeshResult<()> {
        self.send(MeshCommand::Chat(message))
    }

    pub fn shutdown(&self) -> MeshResult<()> {
        self.send(MeshCommand::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
