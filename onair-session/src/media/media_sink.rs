use crate::media::{LocalStream, RemoteTrack};
use std::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Where a session mounts its video: the local preview and the remote stream.
pub trait MediaSink: Send + Sync {
    fn attach_local(&self, stream: &LocalStream);

    /// Called once per track of the remote stream being shown.
    fn attach_remote(&self, track: RemoteTrack);

    /// Releases everything attached so far.
    fn detach(&self);
}

/// Sink for headless use: logs attachments and drains inbound RTP, counting what arrives.
#[derive(Default)]
pub struct LoggingSink {
    readers: Mutex<Vec<JoinHandle<()>>>,
}

impl LoggingSink {
    /// Keeps `handle` for [`MediaSink::detach`], dropping readers whose track already ended.
    fn track_reader(&self, handle: JoinHandle<()>) {
        if let Ok(mut readers) = self.readers.lock() {
            readers.retain(|reader| !reader.is_finished());
            readers.push(handle);
        }
    }

    #[cfg(test)]
    fn reader_count(&self) -> usize {
        self.readers.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl MediaSink for LoggingSink {
    fn attach_local(&self, stream: &LocalStream) {
        info!(
            "Local stream '{}' attached ({} tracks)",
            stream.id(),
            stream.tracks().len()
        );
    }

    fn attach_remote(&self, track: RemoteTrack) {
        info!(
            "Remote {} track '{}' attached from stream '{}'",
            track.kind, track.track_id, track.stream_id
        );

        let Some(reader) = track.reader().cloned() else {
            return;
        };

        let handle = tokio::spawn(async move {
            let mut packets: u64 = 0;
            let mut bytes: usize = 0;

            while let Ok((packet, _)) = reader.read_rtp().await {
                packets += 1;
                bytes += packet.payload.len();
                if packets % 500 == 0 {
                    debug!(
                        "Remote {} track '{}': {} packets, {} bytes",
                        track.kind, track.track_id, packets, bytes
                    );
                }
            }

            info!(
                "Remote {} track '{}' ended after {} packets",
                track.kind, track.track_id, packets
            );
        });

        self.track_reader(handle);
    }

    fn detach(&self) {
        if let Ok(mut readers) = self.readers.lock() {
            for reader in readers.drain(..) {
                reader.abort();
            }
        }
    }
}
