use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use meshroom_core::{PeerId, RoomId, ServerMessage};
use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Outgoing half of one client connection. The WebSocket writer task drains
/// the other end.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

struct Connection {
    outbox: Outbox,
    /// Rooms this identity is a member of; read on disconnect.
    rooms: HashSet<RoomId>,
}

/// Live connections keyed by the identity handed out on connect.
///
/// Lock order: a caller may hold a room entry while touching a connection
/// entry, never the reverse.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<PeerId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a fresh identity to a newly connected client.
    pub fn register(&self, outbox: Outbox) -> PeerId {
        loop {
            let peer_id = PeerId::new();
            if let Entry::Vacant(slot) = self.connections.entry(peer_id) {
                slot.insert(Connection {
                    outbox,
                    rooms: HashSet::new(),
                });
                info!(%peer_id, "Connection registered");
                return peer_id;
            }
        }
    }

    /// Forget a connection. Returns the rooms it was in the first time it is
    /// called for a given identity and `None` afterwards.
    pub fn unregister(&self, peer_id: &PeerId) -> Option<HashSet<RoomId>> {
        let (_, connection) = self.connections.remove(peer_id)?;
        info!(%peer_id, rooms = connection.rooms.len(), "Connection unregistered");
        Some(connection.rooms)
    }

    pub fn is_connected(&self, peer_id: &PeerId) -> bool {
        self.connections.contains_key(peer_id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Queue a frame for a peer. Never blocks; `false` if the peer is gone.
    pub fn send(&self, peer_id: &PeerId, msg: ServerMessage) -> bool {
        let Some(connection) = self.connections.get(peer_id) else {
            debug!(%peer_id, "Dropping frame for disconnected peer");
            return false;
        };
        if connection.outbox.send(msg).is_err() {
            debug!(%peer_id, "Outbox closed, frame dropped");
            return false;
        }
        true
    }

    /// Record room membership on the connection. `false` when the peer has
    /// already disconnected, in which case the join must not go ahead.
    pub(crate) fn attach_room(&self, peer_id: &PeerId, room_id: &RoomId) -> bool {
        match self.connections.get_mut(peer_id) {
            Some(mut connection) => {
                connection.rooms.insert(room_id.clone());
                true
            }
            None => false,
        }
    }

    pub(crate) fn detach_room(&self, peer_id: &PeerId, room_id: &RoomId) {
        if let Some(mut connection) = self.connections.get_mut(peer_id) {
            connection.rooms.remove(room_id);
        }
    }

    pub fn rooms_of(&self, peer_id: &PeerId) -> HashSet<RoomId> {
        self.connections
            .get(peer_id)
            .map(|c| c.rooms.clone())
            .unwrap_or_default()
    }

    /// Whether both peers are connected and have at least one room in common.
    pub fn share_room(&self, a: &PeerId, b: &PeerId) -> bool {
        let rooms_a = self.rooms_of(a);
        if rooms_a.is_empty() {
            return false;
        }
        self.connections
            .get(b)
            .is_some_and(|c| c.rooms.iter().any(|room| rooms_a.contains(room)))
    }
}
