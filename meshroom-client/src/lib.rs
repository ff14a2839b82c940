//! Client side of meshroom: keeps one peer connection per other member of
//! the current room.
//!
//! [`MeshController`] turns relay frames into [`PeerLink`]s and drives a
//! [`PeerConnector`] per link. [`MeshClient`] runs it against a relay over
//! WebSocket; [`WebRtcConnector`] and [`TrackMediaSource`] are the webrtc-rs
//! backed capabilities.

pub mod capability;
pub mod controller;
mod error;
pub mod link;
pub mod transport;

pub use capability::{LocalMedia, MediaSource, PeerConnector, Role, SessionEvent, SessionEvents};
pub use controller::{MeshChannels, MeshCommand, MeshController, MeshEvent, MeshHandle, MeshInput};
pub use error::{ConnectorError, MediaError, MeshError, MeshResult};
pub use link::{LinkId, LinkState, PeerLink};
pub use transport::{
    ConnectorConfig, LocalTracks, MeshClient, RemoteMedia, TrackMediaSource, WebRtcConnector,
    WebRtcSession,
};
