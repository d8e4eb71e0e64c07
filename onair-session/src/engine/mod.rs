use crate::ChatLog;
use crate::media::{LocalStream, LoggingSink, MediaSink, MediaSource, TrackCapture};
use crate::transport::{PeerFactory, PeerTransport, RtcPeerFactory, TransportConfig, TransportEvent};
use anyhow::{Context, Result};
use onair_core::utils::DEFAULT_SIGNAL_URL;
use onair_core::{Role, SignalMessage};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

mod handle_signal_impl;
mod media_impl;
mod negotiation_impl;
mod reconnect_impl;
mod signaling_impl;
mod start_impl;

pub use reconnect_impl::ReconnectPolicy;

use signaling_impl::{SignalingEvent, SignalingLink};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket URL of the relay, e.g. `ws://127.0.0.1:3000` or `ws://host:3000/room`.
    pub url: String,
    pub transport: TransportConfig,
    /// `None` keeps the session down once signaling is lost.
    pub reconnect: Option<ReconnectPolicy>,
    /// Restart the handshake when not connected this long after it began.
    pub negotiation_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SIGNAL_URL.to_owned(),
            transport: TransportConfig::default(),
            reconnect: None,
            negotiation_timeout: None,
        }
    }
}

/// Published session state, as shown to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    SignalingConnecting,
    SignalingOpen,
    Negotiating,
    Connected,
    Disconnected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::SignalingConnecting => "signaling-connecting",
            SessionState::SignalingOpen => "signaling-open",
            SessionState::Negotiating => "negotiating",
            SessionState::Connected => "connected",
            SessionState::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub(crate) enum SessionCommand {
    SendChat(String),
    Close,
}

/// Configures and starts one participant's session.
///
/// Defaults to a `webrtc`-backed peer connection, headless track capture and
/// a logging sink; each can be swapped before [`SessionController::start`].
pub struct SessionController {
    config: SessionConfig,
    peers: Arc<dyn PeerFactory>,
    media: Arc<dyn MediaSource>,
    sink: Arc<dyn MediaSink>,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            peers: Arc::new(RtcPeerFactory),
            media: Arc::new(TrackCapture::default()),
            sink: Arc::new(LoggingSink::default()),
        }
    }

    pub fn with_peer_factory(mut self, peers: Arc<dyn PeerFactory>) -> Self {
        self.peers = peers;
        self
    }

    pub fn with_media_source(mut self, media: Arc<dyn MediaSource>) -> Self {
        self.media = media;
        self
    }

    pub fn with_media_sink(mut self, sink: Arc<dyn MediaSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

/// UI-facing side of a running session. Dropping it tears the session down.
pub struct SessionHandle {
    role: Role,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    state_rx: watch::Receiver<SessionState>,
    local_stream_rx: watch::Receiver<Option<LocalStream>>,
    chat: ChatLog,
    task: JoinHandle<Result<()>>,
}

impl SessionHandle {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Waits until the published state equals `target`. Transient states may be missed.
    pub async fn wait_for_state(&self, target: SessionState, timeout: Duration) -> bool {
        let mut rx = self.state_rx.clone();
        tokio::time::timeout(timeout, async move {
            rx.wait_for(|s| *s == target).await.is_ok()
        })
        .await
        .unwrap_or(false)
    }

    /// The host's captured stream, once acquired. Samples written to its tracks are sent
    /// to the audience. Always `None` for an audience session.
    pub fn local_stream(&self) -> Option<LocalStream> {
        self.local_stream_rx.borrow().clone()
    }

    /// Yields the host's stream each time it is (re)acquired, and `None` once torn down.
    pub fn watch_local_stream(&self) -> watch::Receiver<Option<LocalStream>> {
        self.local_stream_rx.clone()
    }

    /// Waits for the host's stream to be acquired.
    pub async fn wait_for_local_stream(&self, timeout: Duration) -> Option<LocalStream> {
        let mut rx = self.local_stream_rx.clone();
        tokio::time::timeout(timeout, async move {
            rx.wait_for(Option::is_some).await.ok().and_then(|s| (*s).clone())
        })
        .await
        .ok()
        .flatten()
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Chat lines received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.chat.snapshot()
    }

    /// Sends a chat line. Silently dropped while the signaling connection is not open.
    pub fn send_message(&self, text: impl Into<String>) {
        let _ = self.command_tx.send(SessionCommand::SendChat(text.into()));
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Tears the session down and returns how it ended.
    pub async fn close(self) -> Result<()> {
        let _ = self.command_tx.send(SessionCommand::Close);
        self.join().await
    }

    /// Waits for the session to end on its own (e.g. a fatal media error).
    pub async fn join(self) -> Result<()> {
        self.task.await.context("Session task panicked")?
    }
}

/// The session actor. Owns the peer connection and the signaling link and
/// handles one event at a time, so negotiation steps never interleave.
struct Session {
    role: Role,
    config: SessionConfig,
    peer: Box<dyn PeerTransport>,
    media: Arc<dyn MediaSource>,
    sink: Arc<dyn MediaSink>,
    chat: ChatLog,
    state_tx: watch::Sender<SessionState>,

    signaling: Option<SignalingLink>,
    local_stream_tx: watch::Sender<Option<LocalStream>>,
    remote_stream_id: Option<String>,

    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    signaling_rx: mpsc::Receiver<SignalingEvent>,
    signaling_tx: mpsc::Sender<SignalingEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    // Held so `transport_rx` never reports closed while the peer is alive.
    _transport_tx: mpsc::Sender<TransportEvent>,

    negotiation_deadline: Option<Instant>,
    reconnect_at: Option<Instant>,
    reconnect_attempts: u32,
}

impl Session {
    async fn run(mut self) -> Result<()> {
        info!("Session event loop started as {}", self.role);

        let result = self.event_loop().await;
        if let Err(e) = &result {
            warn!("Session stopped: {:#}", e);
        }
        self.teardown(result.is_ok()).await;

        info!("Session event loop finished");
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(SessionCommand::SendChat(text)) => self.send_chat(text),
                    Some(SessionCommand::Close) | None => return Ok(()),
                },

                evt = self.signaling_rx.recv() => match evt {
                    Some(SignalingEvent::Opened(link)) => self.on_signaling_open(link).await?,
                    Some(SignalingEvent::Frame(text)) => self.handle_signal(text).await,
                    Some(SignalingEvent::Closed) => self.on_signaling_closed(),
                    None => return Ok(()),
                },

                evt = self.transport_rx.recv() => match evt {
                    Some(e) => self.handle_transport_event(e),
                    None => {
                        warn!("Transport channel closed unexpectedly");
                        return Ok(());
                    }
                },

                _ = wait_until(self.negotiation_deadline) => self.on_negotiation_timeout().await,

                _ = wait_until(self.reconnect_at) => self.reconnect(),
            }
        }
    }

    async fn on_signaling_open(&mut self, link: SignalingLink) -> Result<()> {
        info!("Signaling connection open");
        self.signaling = Some(link);
        self.reconnect_attempts = 0;
        if self.state() != SessionState::Connected {
            self.set_state(SessionState::SignalingOpen);
        }

        self.begin_handshake().await
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGenerated(candidate) => {
                if !self.send(SignalMessage::Candidate { candidate }) {
                    debug!("Local ICE candidate dropped: signaling is not open");
                }
            }
            TransportEvent::RemoteTrack(track) => self.attach_remote_track(track),
            TransportEvent::StateChanged(state) => self.on_peer_state(state),
        }
    }

    fn send_chat(&self, text: String) {
        if !self.send(SignalMessage::chat(text)) {
            debug!("Chat message dropped: signaling is not open");
        }
    }

    /// Encodes and queues `msg` on the signaling link. Returns false when there is no open link.
    fn send(&self, msg: SignalMessage) -> bool {
        let Some(link) = &self.signaling else {
            return false;
        };

        match link.send(&msg) {
            Ok(()) => {
                debug!("Sent '{}'", msg.kind());
                true
            }
            Err(e) => {
                warn!("Failed to send '{}': {:#}", msg.kind(), e);
                false
            }
        }
    }

    fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    fn set_state(&self, state: SessionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            info!("Session state: {} -> {}", previous, state);
        }
    }

    async fn teardown(&mut self, clean: bool) {
        self.signaling = None;
        self.negotiation_deadline = None;
        self.reconnect_at = None;

        if let Err(e) = self.peer.close().await {
            warn!("Failed to close peer connection: {:#}", e);
        }
        self.sink.detach();
        self.local_stream_tx.send_replace(None);
        self.remote_stream_id = None;

        self.set_state(if clean {
            SessionState::Idle
        } else {
            SessionState::Disconnected
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
