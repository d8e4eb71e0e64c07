use crate::ChatLog;
use crate::engine::signaling_impl::spawn_signaling;
use crate::engine::{Session, SessionController, SessionHandle, SessionState};
use anyhow::{Context, Result};
use onair_core::Role;
use tokio::sync::{mpsc, watch};
use tracing::info;

const SIGNALING_EVENT_BUFFER: usize = 64;
const TRANSPORT_EVENT_BUFFER: usize = 256;

impl SessionController {
    /// Opens the signaling connection and creates the peer connection for `role`.
    ///
    /// Returns once the session task is running; the handshake itself happens
    /// when the relay accepts the connection.
    pub async fn start(self, role: Role) -> Result<SessionHandle> {
        info!("Starting {} session against {}", role, self.config.url);

        let (transport_tx, transport_rx) = mpsc::channel(TRANSPORT_EVENT_BUFFER);
        let peer = self
            .peers
            .create(&self.config.transport, transport_tx.clone())
            .await
            .context("Failed to create peer connection")?;

        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let (local_stream_tx, local_stream_rx) = watch::channel(None);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (signaling_tx, signaling_rx) = mpsc::channel(SIGNALING_EVENT_BUFFER);
        let chat = ChatLog::new();

        let session = Session {
            role,
            config: self.config,
            peer,
            media: self.media,
            sink: self.sink,
            chat: chat.clone(),
            state_tx,
            signaling: None,
            local_stream_tx,
            remote_stream_id: None,
            command_rx,
            signaling_rx,
            signaling_tx,
            transport_rx,
            _transport_tx: transport_tx,
            negotiation_deadline: None,
            reconnect_at: None,
            reconnect_attempts: 0,
        };

        session.set_state(SessionState::SignalingConnecting);
        spawn_signaling(session.config.url.clone(), session.signaling_tx.clone());

        let task = tokio::spawn(session.run());

        Ok(SessionHandle {
            role,
            command_tx,
            state_rx,
            local_stream_rx,
            chat,
            task,
        })
    }
}
