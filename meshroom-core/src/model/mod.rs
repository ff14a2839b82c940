mod chat;
mod membership;
mod peer;
mod room;
mod signaling;

pub use chat::ChatMessage;
pub use membership::{MembershipEvent, MembershipKind};
pub use peer::{PeerId, PeerIdParseError};
pub use room::RoomId;
pub use signaling::IceServerConfig;
