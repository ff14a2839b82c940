use thiserror::Error;

/// Failures of the peer-connection capability. Reported per link; the
/// controller closes the affected link and carries on.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("invalid signal payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("signal rejected: {0}")]
    Rejected(String),

    #[error("webrtc: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Local capture could not be started.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media access denied: {0}")]
    Denied(String),

    #[error("no media device available: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("websocket: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed frame: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("mesh controller has stopped")]
    ControllerGone,
}

pub type MeshResult<T> = Result<T, MeshError>;
