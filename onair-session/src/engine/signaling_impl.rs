use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use onair_core::SignalMessage;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// What the signaling connection reports to the session loop.
#[derive(Debug)]
pub(crate) enum SignalingEvent {
    Opened(SignalingLink),
    Frame(String),
    Closed,
}

/// Sending half of an open signaling connection.
#[derive(Debug, Clone)]
pub(crate) struct SignalingLink {
    tx: mpsc::UnboundedSender<Message>,
}

impl SignalingLink {
    pub(crate) fn send(&self, msg: &SignalMessage) -> Result<()> {
        let json = msg.encode()?;
        self.tx
            .send(Message::Text(json.into()))
            .context("Signaling connection closed")
    }
}

/// Connects to the relay in the background. Exactly one `Closed` is reported
/// per call, whether the connect fails or an open connection ends.
pub(crate) fn spawn_signaling(url: String, events: mpsc::Sender<SignalingEvent>) {
    tokio::spawn(async move {
        let ws_stream = match connect_async(url.as_str()).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                warn!("Failed to connect to relay at {}: {}", url, e);
                let _ = events.send(SignalingEvent::Closed).await;
                return;
            }
        };
        info!("Connected to relay at {}", url);

        let (mut sender, mut receiver) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

        if events
            .send(SignalingEvent::Opened(SignalingLink { tx }))
            .await
            .is_err()
        {
            return;
        }

        let mut send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if sender.send(msg).await.is_err() {
                    break;
                }
            }
            let _ = sender.close().await;
        });

        let frame_tx = events.clone();
        let mut recv_task = tokio::spawn(async move {
            while let Some(Ok(msg)) = receiver.next().await {
                let text = match msg {
                    Message::Text(text) => text.as_str().to_owned(),
                    Message::Binary(data) => match String::from_utf8(data.to_vec()) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("Dropping binary frame that is not UTF-8: {}", e);
                            continue;
                        }
                    },
                    Message::Close(_) => break,
                    _ => continue,
                };

                if frame_tx.send(SignalingEvent::Frame(text)).await.is_err() {
                    break;
                }
            }
        });

        tokio::select! {
            _ = &mut send_task => recv_task.abort(),
            _ = &mut recv_task => send_task.abort(),
        }

        debug!("Signaling connection to {} ended", url);
        let _ = events.send(SignalingEvent::Closed).await;
    });
}
