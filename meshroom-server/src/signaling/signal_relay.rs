use crate::transport::ConnectionRegistry;
use meshroom_core::{PeerId, ServerMessage};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Point-to-point forwarding of negotiation payloads, routed by identity
/// alone.
pub struct SignalRelay {
    connections: Arc<ConnectionRegistry>,
    require_shared_room: bool,
}

impl SignalRelay {
    pub fn new(connections: Arc<ConnectionRegistry>, require_shared_room: bool) -> Self {
        Self {
            connections,
            require_shared_room,
        }
    }

    /// Forward `payload` to `recipient` stamped with `sender`.
    ///
    /// Returns whether the frame was queued. An unreachable recipient is not
    /// an error: signals race with membership and the sender learns about the
    /// departure from the room's `user-left` event.
    pub fn relay(&self, sender: PeerId, recipient: PeerId, payload: Value) -> bool {
        if self.require_shared_room && !self.connections.share_room(&sender, &recipient) {
            debug!(%sender, %recipient, "Signal dropped: peers share no room");
            return false;
        }

        let delivered = self
            .connections
            .send(&recipient, ServerMessage::Signal { sender, payload });
        if !delivered {
            debug!(%sender, %recipient, "Signal dropped: recipient unreachable");
        }
        delivered
    }
}
