use crate::capability::{MediaSource, PeerConnector, Role, SessionEvents};
use crate::controller::{MeshController, MeshEvent};
use crate::link::{LinkId, PeerLink};
use meshroom_core::PeerId;
use serde_json::Value;
use tracing::{debug, info, warn};

impl<C, M> MeshController<C, M>
where
    C: PeerConnector,
    M: MediaSource<Stream = C::LocalStream>,
{
    /// Create a link with a fresh capability instance. A responder's first
    /// payload is fed before the link becomes visible. If the capability
    /// rejects it, the payload was a stray from a link already gone: the
    /// instance is destroyed and nothing is reported.
    pub(super) async fn open_link(&mut self, remote: PeerId, role: Role, first: Option<Value>) {
        let Some(local) = self.local_media.as_ref() else {
            return;
        };
        let id = LinkId(self.next_link);
        self.next_link += 1;

        let events = SessionEvents::new(remote, id, self.session_tx.clone());
        let mut session = match self
            .connector
            .create(remote, role, local.stream(), events)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!(%remote, ?role, "Failed to create peer connection: {}", e);
                self.emit(MeshEvent::LinkFailed {
                    remote,
                    reason: e.to_string(),
                });
                return;
            }
        };

        if let Some(payload) = first {
            if let Err(e) = self.connector.feed(&mut session, payload).await {
                debug!(%remote, link = %id, "Stray signal dropped: {}", e);
                self.connector.destroy(session).await;
                return;
            }
        }

        let mut link = PeerLink::new(id, remote, role);
        link.attach(session);
        info!(%remote, link = %id, ?role, "Link negotiating");
        self.links.insert(remote, link);
    }

    /// Close and forget the link to `remote`, destroying its capability
    /// instance. Returns `false` if there was none.
    pub(super) async fn close_link(&mut self, remote: &PeerId) -> bool {
        let Some(mut link) = self.links.remove(remote) else {
            return false;
        };
        if let Some(session) = link.close() {
            self.connector.destroy(session).await;
        }
        debug!(%remote, link = %link.id(), "Link closed");
        self.emit(MeshEvent::RemoteStreamRemoved { remote: *remote });
        true
    }

    pub(super) async fn fail_link(&mut self, remote: PeerId, reason: String) {
        if self.close_link(&remote).await {
            self.emit(MeshEvent::LinkFailed { remote, reason });
        }
    }

    pub(super) async fn close_all_links(&mut self) {
        let remotes: Vec<PeerId> = self.links.keys().copied().collect();
        for remote in remotes {
            self.close_link(&remote).await;
        }
    }

    pub(super) async fn release_local_media(&mut self) {
        if let Some(local) = self.local_media.take() {
            debug!("Releasing local media");
            self.media_source.release(local.into_stream()).await;
        }
    }
}
