use crate::error::{SignalingError, SignalingResult};
use meshroom_core::{DEFAULT_STUN_ADDR, IceServerConfig};
use std::io;
use std::net::SocketAddr;
use tokio::net::lookup_host;

/// Relay server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed browser origin, or `*` for any.
    pub cors_origin: String,
    /// Handed to every client in its `ice-config` frame.
    pub ice_servers: Vec<IceServerConfig>,
    /// Drop signals between identities that share no room.
    pub require_shared_room: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 3000,
            cors_origin: "http://localhost:5173".to_owned(),
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_ADDR)],
            require_shared_room: false,
        }
    }
}

impl ServerConfig {
    /// Resolve `host:port` to the first address it names. Host names such
    /// as `localhost` go through the system resolver.
    pub async fn resolve_addr(&self) -> SignalingResult<SocketAddr> {
        let invalid = |source| SignalingError::InvalidAddress {
            addr: format!("{}:{}", self.host, self.port),
            source,
        };
        lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(invalid)?
            .next()
            .ok_or_else(|| invalid(io::Error::new(io::ErrorKind::NotFound, "no address resolved")))
    }
}
