mod local_stream;
mod media_sink;
mod placeholder_feed;
mod remote_track;
mod track_capture;

pub use local_stream::*;
pub use media_sink::*;
pub use placeholder_feed::*;
pub use remote_track::*;
pub use track_capture::*;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
    Unknown,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Local capture device. A host acquires audio+video from it once signaling opens.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self) -> Result<LocalStream>;
}
