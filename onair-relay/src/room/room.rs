use crate::room::{Frame, RoomCommand};
use onair_core::PeerId;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info};

/// Room actor. Owns the membership set; every command is handled to completion
/// before the next one is read, so fan-out never races with join or leave.
pub struct Room {
    name: String,
    peers: HashMap<PeerId, mpsc::Sender<Frame>>,
    command_rx: mpsc::Receiver<RoomCommand>,
}

impl Room {
    pub fn new(name: impl Into<String>, command_rx: mpsc::Receiver<RoomCommand>) -> Self {
        Self {
            name: name.into(),
            peers: HashMap::new(),
            command_rx,
        }
    }

    pub async fn run(mut self) {
        info!("Room '{}' event loop started", self.name);

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("Room '{}' command channel closed. Shutting down.", self.name);
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { peer_id, outbound } => {
                self.peers.insert(peer_id, outbound);
                info!(
                    "Peer {} joined room '{}' ({} connected)",
                    peer_id,
                    self.name,
                    self.peers.len()
                );
            }

            RoomCommand::Relay { from, frame } => {
                let delivered = self.fan_out(&from, frame);
                debug!("Frame from {} delivered to {} peer(s)", from, delivered);
            }

            RoomCommand::Leave { peer_id } => {
                if self.peers.remove(&peer_id).is_some() {
                    info!(
                        "Peer {} left room '{}' ({} connected)",
                        peer_id,
                        self.name,
                        self.peers.len()
                    );
                }
            }
        }
    }

    /// Hands `frame` to every member except `from`. Members whose queue is full
    /// or already closed miss this frame; nobody else is affected.
    fn fan_out(&self, from: &PeerId, frame: Frame) -> usize {
        let mut delivered = 0;

        for (peer_id, outbound) in &self.peers {
            if peer_id == from {
                continue;
            }
            match outbound.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!("Peer {} is not writable, skipping frame", peer_id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Peer {} already closed, skipping frame", peer_id);
                }
            }
        }

        delivered
    }
}
