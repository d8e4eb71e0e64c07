use crate::media::RemoteTrack;
use onair_core::IceCandidate;
use std::fmt;

/// Events a peer connection reports back to the session loop.
#[derive(Debug)]
pub enum TransportEvent {
    /// A local ICE candidate was gathered and should be trickled to the remote side.
    CandidateGenerated(IceCandidate),

    /// Remote media arrived.
    RemoteTrack(RemoteTrack),

    StateChanged(PeerState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PeerState::New => "new",
            PeerState::Connecting => "connecting",
            PeerState::Connected => "connected",
            PeerState::Disconnected => "disconnected",
            PeerState::Failed => "failed",
            PeerState::Closed => "closed",
        };
        f.write_str(s)
    }
}
