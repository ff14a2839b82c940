mod connector_config;
mod track_media;
mod webrtc_connector;
mod ws_client;

pub use connector_config::*;
pub use track_media::*;
pub use webrtc_connector::*;
pub use ws_client::*;
