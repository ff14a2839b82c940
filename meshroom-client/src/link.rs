use crate::capability::Role;
use meshroom_core::PeerId;
use std::fmt;

/// Generation of a link. Never reused within one controller, so a new link
/// to a returning member is distinguishable from the one it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    Negotiating,
    Connected,
    Closed,
}

/// One point-to-point connection to one remote member.
///
/// Owns the capability session `T` and, once connected, the remote stream
/// `S`. [`close`](PeerLink::close) hands the session back so the caller can
/// destroy it; a closed link never holds one.
#[derive(Debug)]
pub struct PeerLink<T, S> {
    id: LinkId,
    remote: PeerId,
    role: Role,
    state: LinkState,
    ready_for_signal: bool,
    session: Option<T>,
    remote_stream: Option<S>,
}

impl<T, S> PeerLink<T, S> {
    pub fn new(id: LinkId, remote: PeerId, role: Role) -> Self {
        Self {
            id,
            remote,
            role,
            state: LinkState::Idle,
            ready_for_signal: true,
            session: None,
            remote_stream: None,
        }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn remote(&self) -> PeerId {
        self.remote
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn remote_stream(&self) -> Option<&S> {
        self.remote_stream.as_ref()
    }

    /// Install the capability session. Idle → Negotiating.
    pub fn attach(&mut self, session: T) {
        if self.state == LinkState::Idle {
            self.session = Some(session);
            self.state = LinkState::Negotiating;
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut T> {
        self.session.as_mut()
    }

    pub fn set_ready_for_signal(&mut self, ready: bool) {
        self.ready_for_signal = ready;
    }

    /// Whether an inbound signal may be fed to the session now.
    pub fn accepts_signal(&self) -> bool {
        self.ready_for_signal
            && matches!(self.state, LinkState::Negotiating | LinkState::Connected)
    }

    /// Record the remote stream. Returns `true` only for the transition into
    /// `Connected`; repeated reports refresh the stream silently.
    pub fn mark_connected(&mut self, stream: S) -> bool {
        match self.state {
            LinkState::Negotiating => {
                self.remote_stream = Some(stream);
                self.state = LinkState::Connected;
                true
            }
            LinkState::Connected => {
                self.remote_stream = Some(stream);
                false
            }
            LinkState::Idle | LinkState::Closed => false,
        }
    }

    /// Move to `Closed`, dropping the remote stream and returning the session
    /// that still has to be destroyed.
    pub fn close(&mut self) -> Option<T> {
        self.state = LinkState::Closed;
        self.ready_for_signal = false;
        self.remote_stream = None;
        self.session.take()
    }
}
