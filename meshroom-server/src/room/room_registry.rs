use crate::error::{SignalingError, SignalingResult};
use crate::room::Room;
use crate::transport::ConnectionRegistry;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use meshroom_core::{MembershipEvent, PeerId, RoomId, ServerMessage};
use std::sync::Arc;
use tracing::{debug, info};

/// Room id -> member set.
///
/// Every mutation of a room runs under that room's map entry, and the
/// resulting membership events are queued before the entry is released, so a
/// count announced to members always equals the set size a later read sees.
/// Rooms are created by the first join and dropped by the last leave.
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Room>,
    connections: Arc<ConnectionRegistry>,
}

impl RoomRegistry {
    pub fn new(connections: Arc<ConnectionRegistry>) -> Self {
        Self {
            rooms: DashMap::new(),
            connections,
        }
    }

    /// Add `peer_id` to the room and return the member count.
    ///
    /// The joiner gets a `room-joined` acknowledgement; every other member
    /// gets `user-joined`. A repeated join leaves the set untouched but still
    /// announces, so receivers must treat `user-joined` as idempotent.
    pub fn join(&self, peer_id: PeerId, room_id: &RoomId) -> SignalingResult<usize> {
        let entry = self.rooms.entry(room_id.clone());

        if !self.connections.attach_room(&peer_id, room_id) {
            // Nothing was inserted yet, so a vacant entry is simply released.
            return Err(SignalingError::UnknownPeer(peer_id));
        }

        let mut room = entry.or_default();
        let added = room.insert(peer_id);
        let member_count = room.len();

        if added {
            info!(%peer_id, %room_id, member_count, "Peer joined room");
        } else {
            debug!(%peer_id, %room_id, "Peer re-joined a room it is already in");
        }

        self.connections.send(
            &peer_id,
            ServerMessage::RoomJoined {
                room_id: room_id.clone(),
                member_count,
            },
        );

        let event: ServerMessage =
            MembershipEvent::joined(room_id.clone(), peer_id, member_count).into();
        for member in room.others(&peer_id) {
            self.connections.send(member, event.clone());
        }

        Ok(member_count)
    }

    /// Remove `peer_id` from the room and return the remaining count.
    ///
    /// `None` when the peer was not a member: no event is emitted then.
    pub fn leave(&self, peer_id: PeerId, room_id: &RoomId) -> Option<usize> {
        let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) else {
            return None;
        };
        if !entry.get_mut().remove(&peer_id) {
            return None;
        }
        self.connections.detach_room(&peer_id, room_id);

        let member_count = entry.get().len();
        info!(%peer_id, %room_id, member_count, "Peer left room");

        let event: ServerMessage =
            MembershipEvent::left(room_id.clone(), peer_id, member_count).into();
        for member in entry.get().members() {
            self.connections.send(member, event.clone());
        }

        if member_count == 0 {
            entry.remove();
            info!(%room_id, "Room is empty, removed");
        }

        Some(member_count)
    }

    /// Leave every listed room. Used on disconnect.
    pub fn leave_all<I>(&self, peer_id: PeerId, rooms: I) -> usize
    where
        I: IntoIterator<Item = RoomId>,
    {
        rooms
            .into_iter()
            .filter(|room_id| self.leave(peer_id, room_id).is_some())
            .count()
    }

    pub fn member_count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map(|room| room.len()).unwrap_or(0)
    }

    /// Snapshot of the member set.
    pub fn members(&self, room_id: &RoomId) -> Vec<PeerId> {
        self.rooms
            .get(room_id)
            .map(|room| room.members().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_member(&self, peer_id: &PeerId, room_id: &RoomId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|room| room.contains(peer_id))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
