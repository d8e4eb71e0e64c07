use crate::engine::Session;
use crate::media::RemoteTrack;
use anyhow::{Context, Result};
use tracing::{error, info, warn};

impl Session {
    /// Acquires capture, mounts the local preview and adds every track to the peer.
    pub(super) async fn publish_local_media(&mut self) -> Result<()> {
        let stream = self
            .media
            .acquire()
            .await
            .context("Failed to acquire local media")?;

        self.sink.attach_local(&stream);

        for track in stream.tracks() {
            match self.peer.add_track(track).await {
                Ok(()) => info!("Added local {} track '{}'", track.kind(), track.id()),
                Err(e) => error!("Failed to add local {} track: {:#}", track.kind(), e),
            }
        }

        self.local_stream_tx.send_replace(Some(stream));
        Ok(())
    }

    /// Shows the first remote stream; tracks of any later stream are ignored.
    pub(super) fn attach_remote_track(&mut self, track: RemoteTrack) {
        if let Some(id) = &self.remote_stream_id {
            if *id != track.stream_id {
                warn!(
                    "Ignoring {} track from stream '{}': already showing '{}'",
                    track.kind, track.stream_id, id
                );
                return;
            }
        } else {
            self.remote_stream_id = Some(track.stream_id.clone());
        }

        self.sink.attach_remote(track);
    }
}
