//! Seams to the outside world: the peer-connection engine and local capture.
//!
//! The controller never talks to WebRTC or a camera directly. It drives a
//! [`PeerConnector`] per remote member and borrows one stream from a
//! [`MediaSource`]; tests swap both for in-memory fakes.

mod connector;
mod media;

pub use connector::*;
pub use media::*;
