use crate::media::MediaKind;
use std::fmt;
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// An inbound track announced by the peer connection.
#[derive(Clone)]
pub struct RemoteTrack {
    pub stream_id: String,
    pub track_id: String,
    pub kind: MediaKind,
    reader: Option<Arc<TrackRemote>>,
}

impl RemoteTrack {
    pub fn new(stream_id: impl Into<String>, track_id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            stream_id: stream_id.into(),
            track_id: track_id.into(),
            kind,
            reader: None,
        }
    }

    pub fn with_reader(mut self, reader: Arc<TrackRemote>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// RTP source, when the transport exposes one.
    pub fn reader(&self) -> Option<&Arc<TrackRemote>> {
        self.reader.as_ref()
    }
}

impl fmt::Debug for RemoteTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTrack")
            .field("stream_id", &self.stream_id)
            .field("track_id", &self.track_id)
            .field("kind", &self.kind)
            .field("has_reader", &self.reader.is_some())
            .finish()
    }
}
