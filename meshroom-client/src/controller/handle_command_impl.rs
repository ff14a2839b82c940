use crate::capability::{LocalMedia, MediaSource, PeerConnector};
use crate::controller::{MeshCommand, MeshController, MeshEvent};
use meshroom_core::{ClientMessage, RoomId};
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

impl<C, M> MeshController<C, M>
where
    C: PeerConnector,
    M: MediaSource<Stream = C::LocalStream>,
{
    pub(super) async fn handle_command(&mut self, command: MeshCommand) -> ControlFlow<()> {
        match command {
            MeshCommand::JoinRoom(room_id) => self.join_room(room_id).await,

            MeshCommand::LeaveRoom => {
                self.teardown().await;
            }

            MeshCommand::ToggleAudio(enabled) => {
                let Some(local) = self.local_media.as_mut() else {
                    debug!("Audio toggle without local media ignored");
                    return ControlFlow::Continue(());
                };
                self.media_source.set_audio_enabled(local.stream(), enabled);
                local.set_audio(enabled);
                self.emit_media_changed();
            }

            MeshCommand::ToggleVideo(enabled) => {
                let Some(local) = self.local_media.as_mut() else {
                    debug!("Video toggle without local media ignored");
                    return ControlFlow::Continue(());
                };
                self.media_source.set_video_enabled(local.stream(), enabled);
                local.set_video(enabled);
                self.emit_media_changed();
            }

            MeshCommand::Draw(payload) => {
                if let Some(room_id) = self.current_room("draw") {
                    self.send(ClientMessage::Draw { room_id, payload });
                }
            }

            MeshCommand::ClearCanvas => {
                if let Some(room_id) = self.current_room("clear-canvas") {
                    self.send(ClientMessage::ClearCanvas { room_id });
                }
            }

            MeshCommand::Chat(message) => {
                if let Some(room_id) = self.current_room("chat") {
                    self.send(ClientMessage::ChatMessage { room_id, message });
                }
            }

            MeshCommand::Shutdown => {
                info!("Mesh controller shutting down");
                self.teardown().await;
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Media comes first so that links can be built as soon as the relay
    /// starts announcing members. A capture failure still joins the room.
    async fn join_room(&mut self, room_id: RoomId) {
        if self.room.as_ref() == Some(&room_id) {
            debug!(%room_id, "Already in room");
            return;
        }
        if self.room.is_some() {
            self.teardown().await;
        }

        if self.local_media.is_none() {
            match self.media_source.acquire().await {
                Ok(stream) => {
                    self.local_media = Some(LocalMedia::new(stream));
                    self.emit_media_changed();
                }
                Err(e) => {
                    warn!(%room_id, "Local media unavailable: {}", e);
                    self.emit(MeshEvent::MediaUnavailable {
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(%room_id, "Joining room");
        self.room = Some(room_id.clone());
        self.send(ClientMessage::JoinRoom { room_id });
    }

    pub(super) async fn leave_current_room(&mut self) {
        let Some(room_id) = self.room.take() else {
            return;
        };
        info!(%room_id, "Leaving room");
        self.send(ClientMessage::LeaveRoom {
            room_id: room_id.clone(),
        });
        self.emit(MeshEvent::RoomLeft { room_id });
    }

    fn current_room(&self, what: &str) -> Option<RoomId> {
        if self.room.is_none() {
            warn!("Not in a room, {} dropped", what);
        }
        self.room.clone()
    }

    fn emit_media_changed(&self) {
        if let Some(local) = &self.local_media {
            self.emit(MeshEvent::LocalMediaChanged {
                audio: local.audio_enabled(),
                video: local.video_enabled(),
            });
        }
    }
}
