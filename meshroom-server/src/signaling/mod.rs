mod broadcast_relay;
mod signal_relay;
mod signaling_service;
mod ws_handler;

pub use broadcast_relay::*;
pub use signal_relay::*;
pub use signaling_service::*;
pub use ws_handler::*;
