use onair_core::IceServerConfig;
use onair_core::utils::DEFAULT_STUN_ADDR;

/// ICE settings for the peer connection. One public STUN server, no TURN.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_ADDR)],
        }
    }
}
