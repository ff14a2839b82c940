//! Room membership and signaling relay.
//!
//! ```text
//! GET /ws ── ws_handler ── SignalingService
//!                            ├── ConnectionRegistry  identity -> outbox, rooms
//!                            ├── RoomRegistry        room -> members, join/leave events
//!                            ├── SignalRelay         identity-addressed signals
//!                            └── BroadcastRelay      draw / chat fan-out
//! ```

mod app;
mod config;
mod error;
pub mod room;
pub mod signaling;
pub mod transport;

pub use app::{RoomInfo, router, serve, serve_with};
pub use config::ServerConfig;
pub use error::{SignalingError, SignalingResult};
pub use room::{Room, RoomRegistry};
pub use signaling::{BroadcastRelay, SignalRelay, SignalingService, ws_handler};
pub use transport::{ConnectionRegistry, Outbox};
