use crate::media::{LocalStream, MediaKind};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use webrtc::media::Sample;

const AUDIO_FRAME: Duration = Duration::from_millis(20);
const VIDEO_FRAME: Duration = Duration::from_millis(33);

/// One 20 ms Opus frame of silence.
const OPUS_SILENCE: [u8; 3] = [0xF8, 0xFF, 0xFE];
const VIDEO_FILLER_LEN: usize = 100;

/// Keeps `stream` flowing with stand-in frames: Opus silence on the audio track and
/// a fixed filler frame on the video track. Runs until the returned handle is aborted.
///
/// Used when there is no real encoder behind the capture, so the audience still
/// receives the host's tracks.
pub fn spawn_placeholder_feed(stream: LocalStream) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut audio = tokio::time::interval(AUDIO_FRAME);
        let mut video = tokio::time::interval(VIDEO_FRAME);
        let mut written: u64 = 0;

        loop {
            let kind = tokio::select! {
                _ = audio.tick() => MediaKind::Audio,
                _ = video.tick() => MediaKind::Video,
            };
            let Some(track) = stream.track(kind) else {
                continue;
            };

            match track.write_sample(&placeholder_sample(kind)).await {
                Ok(()) => {
                    written += 1;
                    if written == 1 {
                        debug!("First placeholder frame written to stream '{}'", stream.id());
                    }
                }
                Err(e) => warn!("Failed to write placeholder {} frame: {:#}", kind, e),
            }
        }
    })
}

fn placeholder_sample(kind: MediaKind) -> Sample {
    let (data, duration) = match kind {
        MediaKind::Audio => (OPUS_SILENCE.to_vec(), AUDIO_FRAME),
        _ => (vec![0u8; VIDEO_FILLER_LEN], VIDEO_FRAME),
    };

    Sample {
        data: data.into(),
        duration,
        timestamp: SystemTime::now(),
        ..Default::default()
    }
}
