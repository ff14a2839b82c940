//! The peer-mesh controller.
//!
//! One actor per client. Relay frames, UI commands and capability
//! notifications all funnel into it and are handled one at a time, so a
//! link never sees two transitions at once.
//!
//! ```text
//!   relay frames ─┐
//!   UI commands ──┼─> inbox ──┐
//!                 │           ├─> MeshController ──> outbox (ClientMessage)
//!   capability ───┴─> session ┘        │
//!   notifications     events           └──────────> MeshEvent (UI)
//! ```

mod event;
mod handle;
mod handle_command_impl;
mod handle_server_impl;
mod handle_session_impl;
mod link_impl;

pub use event::*;
pub use handle::*;

use crate::capability::{LocalMedia, MediaSource, PeerConnector, TaggedSessionEvent};
use crate::link::{LinkState, PeerLink};
use meshroom_core::{ClientMessage, PeerId, RoomId};
use std::collections::HashMap;
use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

type Link<C> = PeerLink<<C as PeerConnector>::Session, <C as PeerConnector>::RemoteStream>;

/// Receiving ends handed out with a new controller.
pub struct MeshChannels<S> {
    /// Frames for the relay, in send order.
    pub outbox: mpsc::UnboundedReceiver<ClientMessage>,
    pub events: mpsc::UnboundedReceiver<MeshEvent<S>>,
}

pub struct MeshController<C, M>
where
    C: PeerConnector,
    M: MediaSource<Stream = C::LocalStream>,
{
    connector: C,
    media_source: M,

    local_id: Option<PeerId>,
    room: Option<RoomId>,
    local_media: Option<LocalMedia<C::LocalStream>>,
    links: HashMap<PeerId, Link<C>>,
    next_link: u64,

    inbox_rx: mpsc::UnboundedReceiver<MeshInput>,
    session_tx: mpsc::UnboundedSender<TaggedSessionEvent<C::RemoteStream>>,
    session_rx: mpsc::UnboundedReceiver<TaggedSessionEvent<C::RemoteStream>>,
    outbox: mpsc::UnboundedSender<ClientMessage>,
    events: mpsc::UnboundedSender<MeshEvent<C::RemoteStream>>,
}

impl<C, M> MeshController<C, M>
where
    C: PeerConnector,
    M: MediaSource<Stream = C::LocalStream>,
{
    pub fn new(
        connector: C,
        media_source: M,
    ) -> (Self, MeshHandle, MeshChannels<C::RemoteStream>) {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let controller = Self {
            connector,
            media_source,
            local_id: None,
            room: None,
            local_media: None,
            links: HashMap::new(),
            next_link: 1,
            inbox_rx,
            session_tx,
            session_rx,
            outbox: outbox_tx,
            events: events_tx,
        };

        (
            controller,
            MeshHandle::new(inbox_tx),
            MeshChannels {
                outbox: outbox_rx,
                events: events_rx,
            },
        )
    }

    /// Process inbox and capability notifications until shut down, the
    /// relay connection drops, or every handle is gone.
    pub async fn run(mut self) {
        info!("Mesh controller started");

        loop {
            // Capability reports first, so readiness changes are applied
            // before the next relay frame is looked at.
            tokio::select! {
                biased;

                Some(event) = self.session_rx.recv() => {
                    self.handle_session_event(event).await;
                }

                input = self.inbox_rx.recv() => {
                    let Some(input) = input else {
                        debug!("All mesh handles dropped");
                        break;
                    };
                    if self.dispatch(input).await.is_break() {
                        break;
                    }
                }
            }
        }

        self.teardown().await;
        info!("Mesh controller stopped");
    }

    /// Handle one inbox item. `Break` means the controller is done.
    pub async fn dispatch(&mut self, input: MeshInput) -> ControlFlow<()> {
        match input {
            MeshInput::Server(msg) => {
                self.handle_server(msg).await;
                ControlFlow::Continue(())
            }
            MeshInput::Command(command) => self.handle_command(command).await,
            MeshInput::Disconnected => {
                warn!("Relay connection lost");
                self.teardown().await;
                self.local_id = None;
                self.emit(MeshEvent::Disconnected);
                ControlFlow::Break(())
            }
        }
    }

    /// Handle every capability notification already queued, without
    /// waiting for more. Returns how many were handled.
    pub async fn flush_session_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.session_rx.try_recv() {
            self.handle_session_event(event).await;
            handled += 1;
        }
        handled
    }

    pub fn local_id(&self) -> Option<PeerId> {
        self.local_id
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn local_media(&self) -> Option<&LocalMedia<C::LocalStream>> {
        self.local_media.as_ref()
    }

    pub fn link(&self, remote: &PeerId) -> Option<&Link<C>> {
        self.links.get(remote)
    }

    pub fn link_state(&self, remote: &PeerId) -> Option<LinkState> {
        self.links.get(remote).map(PeerLink::state)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn emit(&self, event: MeshEvent<C::RemoteStream>) {
        let _ = self.events.send(event);
    }

    fn send(&self, msg: ClientMessage) {
        if self.outbox.send(msg).is_err() {
            warn!("Relay outbox closed, frame dropped");
        }
    }

    /// Close every link, let go of local media and leave the room if any.
    async fn teardown(&mut self) {
        self.leave_current_room().await;
        self.close_all_links().await;
        self.release_local_media().await;
    }
}
