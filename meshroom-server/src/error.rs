use meshroom_core::PeerId;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("peer {0} is not connected")]
    UnknownPeer(PeerId),

    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("invalid listen address `{addr}`")]
    InvalidAddress {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid CORS origin `{0}`")]
    InvalidOrigin(String),
}

pub type SignalingResult<T> = Result<T, SignalingError>;
