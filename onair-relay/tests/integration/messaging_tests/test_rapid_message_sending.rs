use crate::integration::init_tracing;
use crate::utils::{FRAME_TIMEOUT_MS, TestClient, settle, spawn_relay};

#[tokio::test]
async fn test_rapid_message_sending() {
    init_tracing();

    let addr = spawn_relay().await.expect("Failed to start relay");
    let mut sender = TestClient::connect(addr, "/", "sender").await.unwrap();
    let mut receiver = TestClient::connect(addr, "/", "receiver").await.unwrap();
    settle().await;

    // Stays under the default per-peer queue depth, so nothing is dropped.
    let count = 40;
    for i in 0..count {
        let frame = format!(r#"{{"type":"chat","content":"message {}"}}"#, i);
        sender.send_text(&frame).await.expect("Send failed");
    }

    for i in 0..count {
        let expected = format!(r#"{{"type":"chat","content":"message {}"}}"#, i);
        assert_eq!(
            receiver.recv_text(FRAME_TIMEOUT_MS).await,
            Some(expected),
            "Frames from one sender must keep their order"
        );
    }

    sender.close().await.unwrap();
    receiver.close().await.unwrap();
}
