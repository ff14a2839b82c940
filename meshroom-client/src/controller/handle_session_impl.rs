use crate::capability::{MediaSource, PeerConnector, SessionEvent, TaggedSessionEvent};
use crate::controller::{MeshController, MeshEvent};
use meshroom_core::ClientMessage;
use tracing::{debug, info, warn};

impl<C, M> MeshController<C, M>
where
    C: PeerConnector,
    M: MediaSource<Stream = C::LocalStream>,
{
    pub(super) async fn handle_session_event(
        &mut self,
        tagged: TaggedSessionEvent<C::RemoteStream>,
    ) {
        let TaggedSessionEvent {
            remote,
            link,
            event,
        } = tagged;

        let current = self.links.get(&remote).map(|l| l.id());
        if current != Some(link) {
            debug!(%remote, %link, "Notification from a closed link dropped");
            return;
        }

        match event {
            SessionEvent::Outbound(payload) => {
                self.send(ClientMessage::Signal {
                    recipient: remote,
                    payload,
                });
            }

            SessionEvent::ReadyForSignal(ready) => {
                if let Some(entry) = self.links.get_mut(&remote) {
                    entry.set_ready_for_signal(ready);
                }
            }

            SessionEvent::RemoteStream(stream) => {
                let Some(entry) = self.links.get_mut(&remote) else {
                    return;
                };
                if entry.mark_connected(stream.clone()) {
                    info!(%remote, role = ?entry.role(), "Link connected");
                    self.emit(MeshEvent::RemoteStreamAvailable { remote, stream });
                }
            }

            SessionEvent::Failed(reason) => {
                warn!(%remote, "Link failed: {}", reason);
                self.fail_link(remote, reason).await;
            }
        }
    }
}
