use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid signaling frame: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode signaling frame: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("unknown role '{0}', expected 'host' or 'audience'")]
    UnknownRole(String),
}
