pub use meshroom_core::{ChatMessage, IceServerConfig, PeerId, RoomId};

pub mod model {
    pub use meshroom_core::model::*;
}

pub mod protocol {
    pub use meshroom_core::protocol::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use meshroom_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use meshroom_client::*;
}
