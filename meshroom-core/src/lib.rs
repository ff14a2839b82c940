//! Shared model and wire protocol for meshroom.
//!
//! Both the relay server and the mesh client speak the frames defined in
//! [`protocol`]; identities, rooms and membership events live in [`model`].

pub mod model;
pub mod protocol;

pub use model::{
    ChatMessage, IceServerConfig, MembershipEvent, MembershipKind, PeerId, PeerIdParseError,
    RoomId,
};
pub use protocol::{ClientMessage, ServerMessage};

/// Public STUN servers used when the operator configures none.
pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
