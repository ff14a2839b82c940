use crate::capability::{MediaSource, PeerConnector, Role};
use crate::controller::{MeshController, MeshEvent};
use meshroom_core::{MembershipKind, PeerId, RoomId, ServerMessage};
use serde_json::Value;
use tracing::{debug, info, warn};

impl<C, M> MeshController<C, M>
where
    C: PeerConnector,
    M: MediaSource<Stream = C::LocalStream>,
{
    pub(super) async fn handle_server(&mut self, msg: ServerMessage) {
        if let Some(event) = msg.membership() {
            if !self.in_room(&event.room_id) {
                debug!(room_id = %event.room_id, "Membership event for another room ignored");
                return;
            }
            self.emit(MeshEvent::MemberCount(event.member_count));
            if Some(event.subject) == self.local_id {
                return;
            }
            match event.kind {
                MembershipKind::Joined => self.on_remote_joined(event.subject).await,
                MembershipKind::Left => self.on_remote_left(event.subject).await,
            }
            return;
        }

        match msg {
            ServerMessage::Welcome { peer_id } => {
                info!(%peer_id, "Identity assigned");
                self.local_id = Some(peer_id);
                self.emit(MeshEvent::Identity(peer_id));
            }

            ServerMessage::IceConfig { ice_servers } => {
                debug!("Received ICE config: {} servers", ice_servers.len());
                self.connector.set_ice_servers(&ice_servers);
                self.emit(MeshEvent::IceServers(ice_servers));
            }

            ServerMessage::RoomJoined {
                room_id,
                member_count,
            } => {
                if !self.in_room(&room_id) {
                    debug!(%room_id, "Stale join ack ignored");
                    return;
                }
                info!(%room_id, member_count, "Joined room");
                self.emit(MeshEvent::RoomJoined {
                    room_id,
                    member_count,
                });
            }

            ServerMessage::RoomLeft { room_id } => {
                debug!(%room_id, "Leave acknowledged");
            }

            ServerMessage::Signal { sender, payload } => {
                self.on_signal(sender, payload).await;
            }

            ServerMessage::Draw { payload } => {
                if self.room.is_some() {
                    self.emit(MeshEvent::Draw(payload));
                }
            }

            ServerMessage::ClearCanvas => {
                if self.room.is_some() {
                    self.emit(MeshEvent::ClearCanvas);
                }
            }

            ServerMessage::ChatMessage { message } => {
                if self.room.is_some() {
                    self.emit(MeshEvent::Chat(message));
                }
            }

            ServerMessage::Error { message } => {
                warn!("Relay reported an error: {}", message);
            }

            ServerMessage::UserJoined { .. } | ServerMessage::UserLeft { .. } => {}
        }
    }

    fn in_room(&self, room_id: &RoomId) -> bool {
        self.room.as_ref() == Some(room_id)
    }

    /// Someone joined after us: we are the one already present, so we start
    /// negotiating. A link that already exists makes this a no-op.
    async fn on_remote_joined(&mut self, remote: PeerId) {
        if self.links.contains_key(&remote) {
            debug!(%remote, "Duplicate join, link already exists");
            return;
        }
        if self.local_media.is_none() {
            debug!(%remote, "No local media, not linking");
            return;
        }
        self.open_link(remote, Role::Initiator, None).await;
    }

    async fn on_remote_left(&mut self, remote: PeerId) {
        if self.close_link(&remote).await {
            info!(%remote, "Remote left, link closed");
        }
    }

    async fn on_signal(&mut self, sender: PeerId, payload: Value) {
        if self.room.is_none() {
            debug!(remote = %sender, "Signal outside a room dropped");
            return;
        }

        if !self.links.contains_key(&sender) {
            if self.local_media.is_none() {
                debug!(remote = %sender, "Signal dropped, no local media");
                return;
            }
            self.open_link(sender, Role::Responder, Some(payload)).await;
            return;
        }

        let Some(link) = self.links.get_mut(&sender) else {
            return;
        };
        if !link.accepts_signal() {
            debug!(remote = %sender, state = ?link.state(), "Signal discarded in current phase");
            return;
        }
        let Some(session) = link.session_mut() else {
            return;
        };

        // A rejected payload is a late duplicate that beat the capability's
        // readiness report. The link keeps running; only `Failed` closes it.
        if let Err(e) = self.connector.feed(session, payload).await {
            debug!(remote = %sender, "Signal discarded by connector: {}", e);
        }
    }
}
