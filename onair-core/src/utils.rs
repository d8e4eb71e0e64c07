/// Public STUN server used when nothing else is configured.
pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

pub const DEFAULT_RELAY_ADDR: &str = "0.0.0.0:3000";

pub const DEFAULT_SIGNAL_URL: &str = "ws://127.0.0.1:3000";

/// Display name of the room served at the relay's root path. Logging only, `/{room}`
/// paths never resolve to it.
pub const DEFAULT_ROOM: &str = "(root)";
