use async_trait::async_trait;
use meshroom_client::{ConnectorError, PeerConnector, Role, SessionEvents};
use meshroom_core::PeerId;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::utils::MockLocalStream;

/// What a link hands to the UI once "connected".
#[derive(Debug, Clone, PartialEq)]
pub struct MockStream {
    pub from: PeerId,
}

/// Everything the controller asked the connector to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorCall {
    Create { remote: PeerId, role: Role },
    Feed { remote: PeerId, kind: String },
    Destroy { remote: PeerId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    AwaitingAnswer,
    AwaitingOffer,
    Done,
}

pub struct MockSession {
    remote: PeerId,
    phase: Phase,
    events: SessionEvents<MockStream>,
}

/// Offer/answer in one round trip, like a non-trickle WebRTC stack.
///
/// - an initiator emits `{"type": "offer"}` on creation
/// - a responder answers an offer with `{"type": "answer"}` and connects
/// - an initiator connects on the answer
/// - `{"type": "fail"}` makes the instance report failure
///
/// Anything else is rejected.
#[derive(Clone, Default)]
pub struct MockConnector {
    live: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<ConnectorCall>>>,
    sinks: Arc<Mutex<Vec<SessionEvents<MockStream>>>>,
    fail_create: Arc<AtomicBool>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capability instances created and not yet destroyed.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<ConnectorCall> {
        self.calls.lock().await.clone()
    }

    pub async fn roles(&self) -> Vec<(PeerId, Role)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                ConnectorCall::Create { remote, role } => Some((*remote, *role)),
                _ => None,
            })
            .collect()
    }

    /// Notification sink of the most recent instance created for `remote`,
    /// still usable after that instance was destroyed.
    pub async fn sink_for(&self, remote: PeerId) -> Option<SessionEvents<MockStream>> {
        self.sinks
            .lock()
            .await
            .iter()
            .rev()
            .find(|sink| sink.remote() == remote)
            .cloned()
    }

    fn connect(session: &mut MockSession) {
        session.phase = Phase::Done;
        session.events.ready_for_signal(false);
        session.events.remote_stream(MockStream {
            from: session.remote,
        });
    }
}

#[async_trait]
impl PeerConnector for MockConnector {
    type LocalStream = MockLocalStream;
    type RemoteStream = MockStream;
    type Session = MockSession;

    async fn create(
        &self,
        remote: PeerId,
        role: Role,
        _local: &MockLocalStream,
        events: SessionEvents<MockStream>,
    ) -> Result<MockSession, ConnectorError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ConnectorError::Rejected("creation disabled".to_owned()));
        }

        self.calls
            .lock()
            .await
            .push(ConnectorCall::Create { remote, role });
        self.sinks.lock().await.push(events.clone());
        self.live.fetch_add(1, Ordering::SeqCst);

        let phase = match role {
            Role::Initiator => {
                events.outbound(json!({"type": "offer"}));
                Phase::AwaitingAnswer
            }
            Role::Responder => Phase::AwaitingOffer,
        };

        Ok(MockSession {
            remote,
            phase,
            events,
        })
    }

    async fn feed(&self, session: &mut MockSession, payload: Value) -> Result<(), ConnectorError> {
        let kind = payload["type"].as_str().unwrap_or_default().to_owned();
        self.calls.lock().await.push(ConnectorCall::Feed {
            remote: session.remote,
            kind: kind.clone(),
        });

        match (session.phase, kind.as_str()) {
            (Phase::AwaitingOffer, "offer") => {
                session.events.outbound(json!({"type": "answer"}));
                Self::connect(session);
                Ok(())
            }
            (Phase::AwaitingAnswer, "answer") => {
                Self::connect(session);
                Ok(())
            }
            (_, "fail") => {
                session.events.failed("remote asked to fail");
                Ok(())
            }
            (phase, kind) => Err(ConnectorError::Rejected(format!(
                "unexpected {:?} while {:?}",
                kind, phase
            ))),
        }
    }

    async fn destroy(&self, session: MockSession) {
        self.calls.lock().await.push(ConnectorCall::Destroy {
            remote: session.remote,
        });
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
