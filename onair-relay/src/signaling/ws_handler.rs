use crate::room::{Frame, RoomHandle};
use crate::server::RelayState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use onair_core::PeerId;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Upgrade handler for the root path: every socket lands in the root room.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<RelayState>) -> impl IntoResponse {
    let room = state.rooms.root_room();
    let outbound_buffer = state.outbound_buffer;

    ws.on_upgrade(move |socket| handle_socket(socket, room, outbound_buffer))
}

/// Upgrade handler for `/{room}`.
pub async fn room_ws_handler(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    State(state): State<RelayState>,
) -> impl IntoResponse {
    let room = state.rooms.room(&room);
    let outbound_buffer = state.outbound_buffer;

    ws.on_upgrade(move |socket| handle_socket(socket, room, outbound_buffer))
}

async fn handle_socket(socket: WebSocket, room: RoomHandle, outbound_buffer: usize) {
    let peer_id = PeerId::new();
    info!("New WebSocket connection {} in room '{}'", peer_id, room.name());

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Frame>(outbound_buffer);

    if let Err(e) = room.join(peer_id, tx).await {
        error!("{:#}", e);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(frame.into()).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let room = room.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                if let Message::Close(_) = msg {
                    break;
                }
                let Some(frame) = Frame::from_message(msg) else {
                    continue;
                };
                debug!("Frame from {} ({} bytes)", peer_id, frame.len());
                if let Err(e) = room.relay(peer_id, frame).await {
                    error!("{:#}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    let _ = room.leave(peer_id).await;
    info!("WebSocket disconnected: {}", peer_id);
}
