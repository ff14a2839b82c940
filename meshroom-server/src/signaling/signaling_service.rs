use crate::config::ServerConfig;
use crate::error::SignalingResult;
use crate::room::RoomRegistry;
use crate::signaling::{BroadcastRelay, SignalRelay};
use crate::transport::{ConnectionRegistry, Outbox};
use meshroom_core::{ClientMessage, IceServerConfig, PeerId, ServerMessage};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct SignalingInner {
    connections: Arc<ConnectionRegistry>,
    rooms: Arc<RoomRegistry>,
    signals: SignalRelay,
    broadcasts: BroadcastRelay,
    ice_servers: Vec<IceServerConfig>,
}

/// Entry point for everything a connected client can do. Cheap to clone;
/// clones share the registries.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(config: &ServerConfig) -> Self {
        let connections = Arc::new(ConnectionRegistry::new());
        let rooms = Arc::new(RoomRegistry::new(connections.clone()));

        Self {
            inner: Arc::new(SignalingInner {
                signals: SignalRelay::new(connections.clone(), config.require_shared_room),
                broadcasts: BroadcastRelay::new(connections.clone(), rooms.clone()),
                connections,
                rooms,
                ice_servers: config.ice_servers.clone(),
            }),
        }
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.inner.connections
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.inner.rooms
    }

    pub fn ice_servers(&self) -> &[IceServerConfig] {
        &self.inner.ice_servers
    }

    /// Register a new connection and greet it with its identity and the ICE
    /// configuration.
    pub fn connect(&self, outbox: Outbox) -> PeerId {
        let peer_id = self.inner.connections.register(outbox);
        self.inner
            .connections
            .send(&peer_id, ServerMessage::Welcome { peer_id });
        self.inner.connections.send(
            &peer_id,
            ServerMessage::IceConfig {
                ice_servers: self.inner.ice_servers.clone(),
            },
        );
        peer_id
    }

    /// Tear down a connection: drop its routing entry, then leave every room
    /// it was in. Safe to call repeatedly; only the first call does anything.
    pub fn disconnect(&self, peer_id: &PeerId) {
        let Some(rooms) = self.inner.connections.unregister(peer_id) else {
            debug!(%peer_id, "Disconnect for unknown peer ignored");
            return;
        };
        let left = self.inner.rooms.leave_all(*peer_id, rooms);
        info!(%peer_id, rooms_left = left, "Peer disconnected");
    }

    /// Parse a text frame from `sender` and act on it.
    pub fn handle_text(&self, sender: PeerId, text: &str) -> SignalingResult<()> {
        let msg: ClientMessage = serde_json::from_str(text)?;
        self.handle_message(sender, msg)
    }

    pub fn handle_message(&self, sender: PeerId, msg: ClientMessage) -> SignalingResult<()> {
        match msg {
            ClientMessage::JoinRoom { room_id } => {
                self.inner.rooms.join(sender, &room_id)?;
            }

            ClientMessage::LeaveRoom { room_id } => {
                if self.inner.rooms.leave(sender, &room_id).is_none() {
                    debug!(peer_id = %sender, %room_id, "Leave for a room the peer is not in");
                }
                self.inner
                    .connections
                    .send(&sender, ServerMessage::RoomLeft { room_id });
            }

            ClientMessage::Signal { recipient, payload } => {
                self.inner.signals.relay(sender, recipient, payload);
            }

            ClientMessage::Draw { room_id, payload } => {
                self.inner
                    .broadcasts
                    .broadcast(&sender, &room_id, ServerMessage::Draw { payload });
            }

            ClientMessage::ClearCanvas { room_id } => {
                self.inner
                    .broadcasts
                    .broadcast(&sender, &room_id, ServerMessage::ClearCanvas);
            }

            ClientMessage::ChatMessage { room_id, message } => {
                let reached =
                    self.inner
                        .broadcasts
                        .broadcast(&sender, &room_id, ServerMessage::ChatMessage { message });
                if reached == 0 {
                    warn!(peer_id = %sender, %room_id, "Chat message reached nobody");
                }
            }
        }
        Ok(())
    }
}
