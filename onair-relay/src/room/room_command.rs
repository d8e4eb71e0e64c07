use crate::room::Frame;
use onair_core::PeerId;
use tokio::sync::mpsc;

/// Commands delivered to a room by the socket handlers.
#[derive(Debug)]
pub enum RoomCommand {
    /// A socket was accepted; `outbound` feeds its writer task.
    Join {
        peer_id: PeerId,
        outbound: mpsc::Sender<Frame>,
    },

    /// A frame arrived from `from` and must reach every other member.
    Relay { from: PeerId, frame: Frame },

    /// The socket closed, normally or with an error.
    Leave { peer_id: PeerId },
}
