use anyhow::{Context, Result};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Raw WebSocket peer that records every data frame the relay hands it.
pub struct TestClient {
    pub name: String,
    sink: WsSink,
    inbox: mpsc::UnboundedReceiver<Message>,
}

impl TestClient {
    /// Connect to `path` ("/" for the root room) on a running relay.
    pub async fn connect(addr: SocketAddr, path: &str, name: &str) -> Result<Self> {
        let url = format!("ws://{}{}", addr, path);
        let (stream, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("Failed to connect {} to {}", name, url))?;

        let (sink, mut source) = stream.split();
        let (tx, inbox) = mpsc::unbounded_channel();

        let label = name.to_owned();
        tokio::spawn(async move {
            while let Some(Ok(msg)) = source.next().await {
                match msg {
                    Message::Text(_) | Message::Binary(_) => {
                        tracing::debug!("[TestClient {}] frame received", label);
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        });

        Ok(Self {
            name: name.to_owned(),
            sink,
            inbox,
        })
    }

    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.sink
            .send(Message::Text(text.to_owned().into()))
            .await
            .context("Failed to send text frame")
    }

    pub async fn send_binary(&mut self, data: &[u8]) -> Result<()> {
        self.sink
            .send(Message::Binary(data.to_vec().into()))
            .await
            .context("Failed to send binary frame")
    }

    /// Next data frame, or `None` if nothing arrives within `timeout_ms`.
    pub async fn recv(&mut self, timeout_ms: u64) -> Option<Message> {
        tokio::time::timeout(Duration::from_millis(timeout_ms), self.inbox.recv())
            .await
            .ok()
            .flatten()
    }

    pub async fn recv_text(&mut self, timeout_ms: u64) -> Option<String> {
        match self.recv(timeout_ms).await? {
            Message::Text(text) => Some(text.as_str().to_owned()),
            _ => None,
        }
    }

    /// True when no frame shows up for `timeout_ms`.
    pub async fn stays_silent(&mut self, timeout_ms: u64) -> bool {
        self.recv(timeout_ms).await.is_none()
    }

    pub async fn close(mut self) -> Result<()> {
        self.sink.close().await.context("Failed to close socket")
    }
}
