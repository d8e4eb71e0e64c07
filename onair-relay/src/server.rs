use crate::room::RoomManager;
use crate::signaling::{room_ws_handler, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use onair_core::utils::DEFAULT_RELAY_ADDR;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Relay settings. The defaults match a bare `onair relay`.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: String,
    /// Frames queued per peer before that peer starts missing frames.
    pub outbound_buffer: usize,
    /// Depth of each room's command queue.
    pub command_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_RELAY_ADDR.to_owned(),
            outbound_buffer: 64,
            command_buffer: 256,
        }
    }
}

/// Shared state handed to the upgrade handlers.
#[derive(Clone)]
pub struct RelayState {
    pub rooms: RoomManager,
    pub outbound_buffer: usize,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            rooms: RoomManager::new(config.command_buffer),
            outbound_buffer: config.outbound_buffer.max(1),
        }
    }
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/{room}", get(room_ws_handler))
        .with_state(state)
}

pub struct RelayServer {
    listener: TcpListener,
    state: RelayState,
}

impl RelayServer {
    pub async fn bind(config: RelayConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind relay on {}", config.bind_addr))?;

        Ok(Self {
            listener,
            state: RelayState::new(&config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Relay listener has no local address")
    }

    pub fn state(&self) -> &RelayState {
        &self.state
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.local_addr()?;
        info!("Signaling relay listening on ws://{}", addr);

        axum::serve(self.listener, router(self.state))
            .await
            .context("Relay server stopped")
    }
}
