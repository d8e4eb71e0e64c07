use crate::media::MediaKind;
use anyhow::Result;
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// A captured track. Encoded samples written here go to every peer connection it was added to.
#[derive(Clone)]
pub struct LocalTrack {
    kind: MediaKind,
    track: Arc<TrackLocalStaticSample>,
}

impl LocalTrack {
    /// Opus for audio, VP8 for everything else.
    pub fn new(kind: MediaKind, id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        let mime_type = match kind {
            MediaKind::Audio => MIME_TYPE_OPUS,
            _ => MIME_TYPE_VP8,
        };

        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: mime_type.to_owned(),
                ..Default::default()
            },
            id.into(),
            stream_id.into(),
        ));

        Self { kind, track }
    }

    pub fn id(&self) -> &str {
        self.track.id()
    }

    pub fn stream_id(&self) -> &str {
        self.track.stream_id()
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn sample_track(&self) -> Arc<TrackLocalStaticSample> {
        Arc::clone(&self.track)
    }

    pub async fn write_sample(&self, sample: &Sample) -> Result<()> {
        self.track.write_sample(sample).await?;
        Ok(())
    }
}

/// Tracks captured together under one stream id.
#[derive(Clone)]
pub struct LocalStream {
    id: String,
    tracks: Vec<LocalTrack>,
}

impl LocalStream {
    pub fn new(id: impl Into<String>, tracks: Vec<LocalTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn track(&self, kind: MediaKind) -> Option<&LocalTrack> {
        self.tracks.iter().find(|t| t.kind() == kind)
    }
}
