use crate::media::{LocalTrack, MediaKind, RemoteTrack};
use crate::transport::{PeerFactory, PeerState, PeerTransport, TransportConfig, TransportEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use onair_core::{IceCandidate, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Builds [`RtcPeer`]s backed by the `webrtc` crate.
#[derive(Debug, Default, Clone)]
pub struct RtcPeerFactory;

#[async_trait]
impl PeerFactory for RtcPeerFactory {
    async fn create(
        &self,
        config: &TransportConfig,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>> {
        Ok(Box::new(RtcPeer::new(config, events).await?))
    }
}

pub struct RtcPeer {
    peer_connection: Arc<RTCPeerConnection>,
}

impl RtcPeer {
    /// Creates the peer connection and wires its callbacks into `event_tx`.
    pub async fn new(config: &TransportConfig, event_tx: mpsc::Sender<TransportEvent>) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    debug!("Peer connection state changed: {}", s);
                    let _ = tx.send(TransportEvent::StateChanged(peer_state(s))).await;
                })
            },
        ));

        // Trickle ICE: each gathered candidate goes out on its own.
        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(from_candidate_init(init)))
                    .await;
            })
        }));

        let track_tx = event_tx.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();

                Box::pin(async move {
                    let remote = RemoteTrack::new(
                        track.stream_id(),
                        track.id(),
                        media_kind(track.kind()),
                    )
                    .with_reader(track);
                    info!(
                        "Remote {} track {} arrived on stream {}",
                        remote.kind, remote.track_id, remote.stream_id
                    );
                    let _ = tx.send(TransportEvent::RemoteTrack(remote)).await;
                })
            },
        ));

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl PeerTransport for RtcPeer {
    async fn add_track(&self, track: &LocalTrack) -> Result<()> {
        let local: Arc<dyn TrackLocal + Send + Sync> = track.sample_track();
        let rtp_sender = self
            .peer_connection
            .add_track(local)
            .await
            .with_context(|| format!("Failed to add {} track", track.kind()))?;

        // RTCP has to be drained for interceptors (NACK, reports) to work.
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while rtp_sender.read(&mut rtcp_buf).await.is_ok() {}
        });

        Ok(())
    }

    async fn create_offer(&self) -> Result<String> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(answer.sdp)
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_local_description(to_rtc_description(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_remote_description(to_rtc_description(desc)?)
            .await?;
        Ok(())
    }

    async fn local_description(&self) -> Option<SessionDescription> {
        let desc = self.peer_connection.local_description().await?;
        match desc.sdp_type {
            RTCSdpType::Offer => Some(SessionDescription::offer(desc.sdp)),
            RTCSdpType::Answer => Some(SessionDescription::answer(desc.sdp)),
            _ => None,
        }
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(to_candidate_init(candidate))
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn to_rtc_description(desc: SessionDescription) -> Result<RTCSessionDescription> {
    let rtc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp),
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp),
    };
    rtc.context("Invalid SDP")
}

fn to_candidate_init(candidate: IceCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.candidate,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: candidate.sdp_m_line_index,
        username_fragment: candidate.username_fragment,
    }
}

fn from_candidate_init(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}

fn peer_state(state: RTCPeerConnectionState) -> PeerState {
    match state {
        RTCPeerConnectionState::Connecting => PeerState::Connecting,
        RTCPeerConnectionState::Connected => PeerState::Connected,
        RTCPeerConnectionState::Disconnected => PeerState::Disconnected,
        RTCPeerConnectionState::Failed => PeerState::Failed,
        RTCPeerConnectionState::Closed => PeerState::Closed,
        _ => PeerState::New,
    }
}

fn media_kind(kind: RTPCodecType) -> MediaKind {
    match kind {
        RTPCodecType::Audio => MediaKind::Audio,
        RTPCodecType::Video => MediaKind::Video,
        _ => MediaKind::Unknown,
    }
}
