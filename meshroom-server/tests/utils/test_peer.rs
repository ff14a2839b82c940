use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use meshroom_core::{ClientMessage, PeerId, RoomId, ServerMessage};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Timeout for a single expected frame (ms).
pub const FRAME_TIMEOUT_MS: u64 = 2000;

/// How long to wait before concluding nothing else is coming (ms).
pub const QUIET_PERIOD_MS: u64 = 200;

/// A raw WebSocket participant that speaks the frame protocol directly.
pub struct TestPeer {
    pub peer_id: PeerId,
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestPeer {
    /// Connect and consume the `welcome` / `ice-config` greeting.
    pub async fn connect(url: &str) -> Result<Self> {
        let (socket, _) = connect_async(url)
            .await
            .context("Failed to open WebSocket")?;
        let mut peer = Self {
            peer_id: PeerId::new(),
            socket,
        };

        match peer.recv().await? {
            ServerMessage::Welcome { peer_id } => peer.peer_id = peer_id,
            other => anyhow::bail!("Expected welcome, got {:?}", other),
        }
        match peer.recv().await? {
            ServerMessage::IceConfig { .. } => {}
            other => anyhow::bail!("Expected ice-config, got {:?}", other),
        }

        Ok(peer)
    }

    pub async fn send(&mut self, msg: &ClientMessage) -> Result<()> {
        let json = serde_json::to_string(msg)?;
        self.socket.send(Message::Text(json.into())).await?;
        Ok(())
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.socket.send(Message::Text(text.to_owned().into())).await?;
        Ok(())
    }

    /// Join and wait for the acknowledgement; returns the member count.
    pub async fn join(&mut self, room: &str) -> Result<usize> {
        self.send(&ClientMessage::JoinRoom {
            room_id: RoomId::from(room),
        })
        .await?;
        match self.recv().await? {
            ServerMessage::RoomJoined { member_count, .. } => Ok(member_count),
            other => anyhow::bail!("Expected room-joined, got {:?}", other),
        }
    }

    pub async fn signal(&mut self, recipient: PeerId, payload: Value) -> Result<()> {
        self.send(&ClientMessage::Signal { recipient, payload }).await
    }

    /// Next server frame, failing after [`FRAME_TIMEOUT_MS`].
    pub async fn recv(&mut self) -> Result<ServerMessage> {
        self.recv_within(FRAME_TIMEOUT_MS)
            .await?
            .context("Timeout waiting for server frame")
    }

    /// Assert that nothing arrives for [`QUIET_PERIOD_MS`].
    pub async fn expect_silence(&mut self) -> Result<()> {
        match self.recv_within(QUIET_PERIOD_MS).await? {
            None => Ok(()),
            Some(frame) => anyhow::bail!("Expected silence, got {:?}", frame),
        }
    }

    async fn recv_within(&mut self, timeout_ms: u64) -> Result<Option<ServerMessage>> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let next = tokio::time::timeout_at(deadline, self.socket.next()).await;
            let msg = match next {
                Err(_) => return Ok(None),
                Ok(None) => anyhow::bail!("Socket closed"),
                Ok(Some(msg)) => msg?,
            };
            if let Message::Text(text) = msg {
                return Ok(Some(serde_json::from_str(text.as_str())?));
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}
