mod peer_transport;
mod rtc_peer;
mod transport_config;
mod transport_event;

pub use peer_transport::*;
pub use rtc_peer::*;
pub use transport_config::*;
pub use transport_event::*;
