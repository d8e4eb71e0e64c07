pub use onair_core::{PeerId, ProtocolError, Role, SignalMessage};

pub mod model {
    pub use onair_core::model::*;
    pub use onair_core::utils::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use onair_relay::*;
}

#[cfg(feature = "session")]
pub mod session {
    pub use onair_session::*;
}
