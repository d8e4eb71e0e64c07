use crate::media::{LocalStream, LocalTrack, MediaKind, MediaSource};
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Headless capture: an Opus and a VP8 sample track under one stream id.
/// Whoever holds the attached [`LocalStream`] feeds them encoded frames.
#[derive(Debug, Clone)]
pub struct TrackCapture {
    stream_id: String,
}

impl TrackCapture {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
        }
    }
}

impl Default for TrackCapture {
    fn default() -> Self {
        Self::new("onair")
    }
}

#[async_trait]
impl MediaSource for TrackCapture {
    async fn acquire(&self) -> Result<LocalStream> {
        let tracks = vec![
            LocalTrack::new(MediaKind::Audio, "audio", self.stream_id.as_str()),
            LocalTrack::new(MediaKind::Video, "video", self.stream_id.as_str()),
        ];
        info!("Captured local stream '{}' (audio + video)", self.stream_id);

        Ok(LocalStream::new(self.stream_id.clone(), tracks))
    }
}
