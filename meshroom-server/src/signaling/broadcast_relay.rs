use crate::room::RoomRegistry;
use crate::transport::ConnectionRegistry;
use meshroom_core::{PeerId, RoomId, ServerMessage};
use std::sync::Arc;

/// Room-scoped fan-out for drawing and chat frames. Best effort: no
/// acknowledgement, nothing is kept.
pub struct BroadcastRelay {
    connections: Arc<ConnectionRegistry>,
    rooms: Arc<RoomRegistry>,
}

impl BroadcastRelay {
    pub fn new(connections: Arc<ConnectionRegistry>, rooms: Arc<RoomRegistry>) -> Self {
        Self { connections, rooms }
    }

    /// Send `frame` to every member of `room_id` except `sender`. Returns how
    /// many members it was queued for.
    pub fn broadcast(&self, sender: &PeerId, room_id: &RoomId, frame: ServerMessage) -> usize {
        self.rooms
            .members(room_id)
            .iter()
            .filter(|member| *member != sender)
            .filter(|member| self.connections.send(member, frame.clone()))
            .count()
    }
}
