use meshroom_core::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2, IceServerConfig};
use std::time::Duration;

/// Settings for [`WebRtcConnector`](crate::transport::WebRtcConnector).
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Used until the relay sends its own `ice-config`.
    pub ice_servers: Vec<IceServerConfig>,
    /// Upper bound on waiting for candidate gathering before a description
    /// is sent anyway.
    pub gathering_timeout: Duration,
    /// Offer 127.0.0.1 candidates too.
    pub include_loopback: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_ADDR.to_owned(), DEFAULT_STUN_ADDR_2.to_owned()],
                username: None,
                credential: None,
            }],
            gathering_timeout: Duration::from_secs(10),
            include_loopback: false,
        }
    }
}

impl ConnectorConfig {
    /// Host candidates only, loopback included. Enough for peers on the same
    /// machine or LAN.
    pub fn local_only() -> Self {
        Self {
            ice_servers: Vec::new(),
            include_loopback: true,
            ..Self::default()
        }
    }
}
