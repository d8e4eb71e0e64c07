mod peer;
mod role;
mod signaling;

pub use peer::PeerId;
pub use role::Role;
pub use signaling::{IceCandidate, IceServerConfig, SdpKind, SessionDescription, SignalMessage};
