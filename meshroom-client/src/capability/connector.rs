use crate::error::ConnectorError;
use crate::link::LinkId;
use async_trait::async_trait;
use meshroom_core::{IceServerConfig, PeerId};
use serde_json::Value;
use tokio::sync::mpsc;

/// Which side of a pair starts negotiation. The member already in the room
/// initiates toward the newcomer; the newcomer only answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Initiator,
    Responder,
}

/// Something a capability instance wants the controller to know.
#[derive(Debug, Clone)]
pub enum SessionEvent<S> {
    /// A signaling payload to relay to the remote member.
    Outbound(Value),
    /// Negotiation finished and media from the remote is flowing.
    RemoteStream(S),
    /// Whether the instance can take another inbound signal right now.
    ReadyForSignal(bool),
    Failed(String),
}

#[derive(Debug)]
pub(crate) struct TaggedSessionEvent<S> {
    pub(crate) remote: PeerId,
    pub(crate) link: LinkId,
    pub(crate) event: SessionEvent<S>,
}

/// Notification sink handed to exactly one capability instance.
///
/// Every notification carries the link generation it was created for, so
/// whatever an instance reports after its link was closed is dropped by the
/// controller instead of touching a newer link to the same remote.
pub struct SessionEvents<S> {
    remote: PeerId,
    link: LinkId,
    tx: mpsc::UnboundedSender<TaggedSessionEvent<S>>,
}

impl<S> Clone for SessionEvents<S> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote,
            link: self.link,
            tx: self.tx.clone(),
        }
    }
}

impl<S> SessionEvents<S> {
    pub(crate) fn new(
        remote: PeerId,
        link: LinkId,
        tx: mpsc::UnboundedSender<TaggedSessionEvent<S>>,
    ) -> Self {
        Self { remote, link, tx }
    }

    pub fn remote(&self) -> PeerId {
        self.remote
    }

    pub fn link(&self) -> LinkId {
        self.link
    }

    pub fn outbound(&self, payload: Value) {
        self.emit(SessionEvent::Outbound(payload));
    }

    pub fn remote_stream(&self, stream: S) {
        self.emit(SessionEvent::RemoteStream(stream));
    }

    pub fn ready_for_signal(&self, ready: bool) {
        self.emit(SessionEvent::ReadyForSignal(ready));
    }

    pub fn failed(&self, reason: impl Into<String>) {
        self.emit(SessionEvent::Failed(reason.into()));
    }

    fn emit(&self, event: SessionEvent<S>) {
        // The controller is gone; nobody is left to care.
        let _ = self.tx.send(TaggedSessionEvent {
            remote: self.remote,
            link: self.link,
            event,
        });
    }
}

/// The peer-connection engine, one instance per remote member.
///
/// Instances report back through their [`SessionEvents`]; the controller
/// owns the returned session and always hands it back to
/// [`destroy`](PeerConnector::destroy), whichever way the link ends.
#[async_trait]
pub trait PeerConnector: Send + Sync + 'static {
    type LocalStream: Send + Sync + 'static;
    type RemoteStream: Clone + Send + Sync + 'static;
    type Session: Send + 'static;

    /// Start a new instance. An initiator is expected to emit its opening
    /// payload through `events` on its own.
    async fn create(
        &self,
        remote: PeerId,
        role: Role,
        local: &Self::LocalStream,
        events: SessionEvents<Self::RemoteStream>,
    ) -> Result<Self::Session, ConnectorError>;

    /// Hand an inbound signaling payload to an instance. `Err` means the
    /// payload does not fit the current negotiation; the instance itself
    /// stays usable. Report a broken instance through `SessionEvents::failed`.
    async fn feed(&self, session: &mut Self::Session, payload: Value) -> Result<(), ConnectorError>;

    async fn destroy(&self, session: Self::Session);

    /// ICE servers announced by the relay. Applies to instances created
    /// afterwards.
    fn set_ice_servers(&self, _servers: &[IceServerConfig]) {}
}
