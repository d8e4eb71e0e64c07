use crate::integration::{create_test_room, init_tracing, join_peer};
use crate::utils::{FRAME_TIMEOUT_MS, TestClient, settle, spawn_relay};
use onair_relay::Frame;

#[tokio::test]
async fn test_disconnected_socket_stops_receiving() {
    init_tracing();

    let addr = spawn_relay().await.expect("Failed to start relay");
    let mut host = TestClient::connect(addr, "/", "host").await.unwrap();
    let mut audience = TestClient::connect(addr, "/", "audience").await.unwrap();
    let leaving = TestClient::connect(addr, "/", "leaving").await.unwrap();
    settle().await;

    leaving.close().await.expect("Failed to close client");
    settle().await;

    host.send_text(r#"{"type":"chat","content":"still here?"}"#)
        .await
        .expect("Send failed");

    assert_eq!(
        audience.recv_text(FRAME_TIMEOUT_MS).await.as_deref(),
        Some(r#"{"type":"chat","content":"still here?"}"#)
    );

    let mut late = TestClient::connect(addr, "/", "late").await.unwrap();
    settle().await;
    audience.send_text(r#"{"type":"need-offer"}"#).await.unwrap();

    assert_eq!(
        host.recv_text(FRAME_TIMEOUT_MS).await.as_deref(),
        Some(r#"{"type":"need-offer"}"#)
    );
    assert_eq!(
        late.recv_text(FRAME_TIMEOUT_MS).await.as_deref(),
        Some(r#"{"type":"need-offer"}"#)
    );

    host.close().await.unwrap();
    audience.close().await.unwrap();
    late.close().await.unwrap();
}

#[tokio::test]
async fn test_leave_takes_effect_before_next_frame() {
    init_tracing();

    let room = create_test_room();
    let (sender, _sender_rx) = join_peer(&room, 8).await;
    let (_stay, mut stay_rx) = join_peer(&room, 8).await;
    let (gone, mut gone_rx) = join_peer(&room, 8).await;

    room.leave(gone).await.unwrap();
    room.relay(sender, Frame::Text("after leave".to_owned()))
        .await
        .unwrap();

    assert_eq!(
        stay_rx.recv().await,
        Some(Frame::Text("after leave".to_owned()))
    );
    // The room dropped its sender for `gone`, so its queue ends without the frame.
    assert_eq!(gone_rx.recv().await, None);
}
