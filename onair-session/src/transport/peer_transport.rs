use crate::media::LocalTrack;
use crate::transport::{TransportConfig, TransportEvent};
use anyhow::Result;
use async_trait::async_trait;
use onair_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;

/// One side of a WebRTC session as the negotiation loop sees it.
///
/// Implementations report gathered candidates, remote tracks and connection
/// state through the event sender they were created with.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn add_track(&self, track: &LocalTrack) -> Result<()>;

    /// Creates an offer SDP. May be called any number of times per session.
    async fn create_offer(&self) -> Result<String>;

    async fn create_answer(&self) -> Result<String>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn local_description(&self) -> Option<SessionDescription>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Creates the peer connection for a starting session.
#[async_trait]
pub trait PeerFactory: Send + Sync {
    async fn create(
        &self,
        config: &TransportConfig,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>>;
}
