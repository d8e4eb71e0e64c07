use crate::room::{Frame, Room, RoomCommand};
use anyhow::{Context, Result};
use dashmap::DashMap;
use onair_core::PeerId;
use onair_core::utils::DEFAULT_ROOM;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Registry of room actors. Named rooms are keyed by `Some(name)`, the root-path room
/// by `None`, so no path segment can reach the root room. Rooms live for the process lifetime.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<Option<String>, mpsc::Sender<RoomCommand>>>,
    command_buffer: usize,
}

impl RoomManager {
    pub fn new(command_buffer: usize) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            command_buffer,
        }
    }

    /// Returns a handle to `name`, spawning the room actor on first use.
    pub fn room(&self, name: &str) -> RoomHandle {
        self.get_or_spawn(Some(name.to_owned()), name)
    }

    /// The room served at the relay's root path.
    pub fn root_room(&self) -> RoomHandle {
        self.get_or_spawn(None, DEFAULT_ROOM)
    }

    fn get_or_spawn(&self, key: Option<String>, name: &str) -> RoomHandle {
        let tx = self
            .rooms
            .entry(key)
            .or_insert_with(|| {
                info!("Creating new room: {}", name);
                let (tx, rx) = mpsc::channel(self.command_buffer);
                tokio::spawn(Room::new(name, rx).run());
                tx
            })
            .clone();

        RoomHandle {
            name: name.to_owned(),
            tx,
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// Sending side of one room, used by a socket handler for its whole lifetime.
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn join(&self, peer_id: PeerId, outbound: mpsc::Sender<Frame>) -> Result<()> {
        self.tx
            .send(RoomCommand::Join { peer_id, outbound })
            .await
            .with_context(|| format!("Room '{}' died", self.name))
    }

    pub async fn relay(&self, from: PeerId, frame: Frame) -> Result<()> {
        self.tx
            .send(RoomCommand::Relay { from, frame })
            .await
            .with_context(|| format!("Room '{}' died", self.name))
    }

    pub async fn leave(&self, peer_id: PeerId) -> Result<()> {
        self.tx
            .send(RoomCommand::Leave { peer_id })
            .await
            .with_context(|| format!("Room '{}' died", self.name))
    }
}
