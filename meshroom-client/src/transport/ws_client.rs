use crate::capability::{MediaSource, PeerConnector};
use crate::controller::{MeshController, MeshEvent, MeshHandle};
use crate::error::MeshResult;
use futures::{SinkExt, StreamExt};
use meshroom_core::ServerMessage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// A controller wired to a relay over WebSocket.
///
/// Frames read from the socket go to the controller inbox in arrival order;
/// whatever the controller puts in its outbox is written back in order.
pub struct MeshClient {
    handle: MeshHandle,
    controller_task: JoinHandle<()>,
    reader_task: JoinHandle<()>,
    writer_task: JoinHandle<()>,
}

impl MeshClient {
    pub async fn connect<C, M>(
        url: &str,
        connector: C,
        media_source: M,
    ) -> MeshResult<(Self, mpsc::UnboundedReceiver<MeshEvent<C::RemoteStream>>)>
    where
        C: PeerConnector,
        M: MediaSource<Stream = C::LocalStream>,
    {
        let (socket, _) = connect_async(url).await?;
        info!(%url, "Connected to relay");
        let (mut sink, mut stream) = socket.split();

        let (controller, handle, channels) = MeshController::new(connector, media_source);
        let mut outbox = channels.outbox;
        let controller_task = tokio::spawn(controller.run());

        let writer_task = tokio::spawn(async move {
            while let Some(msg) = outbox.recv().await {
                let json = match serde_json::to_string(&msg) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize frame: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
            debug!("Relay writer stopped");
        });

        let reader_handle = handle.clone();
        let reader_task = tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ServerMessage>(text.as_str()) {
                            Ok(msg) => {
                                if reader_handle.server_frame(msg).is_err() {
                                    return;
                                }
                            }
                            Err(e) => warn!("Malformed frame from relay: {}", e),
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Relay connection error: {}", e);
                        break;
                    }
                }
            }
            let _ = reader_handle.disconnected();
        });

        Ok((
            Self {
                handle,
                controller_task,
                reader_task,
                writer_task,
            },
            channels.events,
        ))
    }

    pub fn handle(&self) -> &MeshHandle {
        &self.handle
    }

    /// Leave the room, tear everything down and close the socket once the
    /// last frame is flushed.
    pub async fn close(self) {
        let _ = self.handle.shutdown();
        if let Err(e) = self.controller_task.await {
            error!("Mesh controller task failed: {}", e);
        }
        let _ = self.writer_task.await;
        self.reader_task.abort();
    }

    /// Wait until the controller stops on its own, e.g. after the relay
    /// went away.
    pub async fn closed(self) {
        let _ = self.controller_task.await;
        let _ = self.writer_task.await;
        self.reader_task.abort();
    }
}
