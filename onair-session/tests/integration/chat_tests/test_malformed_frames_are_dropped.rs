use crate::integration::init_tracing;
use crate::utils::{
    PeerClient, STEP_TIMEOUT_MS, eventually, session_config, settle, spawn_relay,
    start_mock_session,
};
use onair_core::{Role, SignalMessage};

#[tokio::test]
async fn test_malformed_frames_are_dropped() {
    init_tracing();

    let addr = spawn_relay().await.expect("Failed to start relay");
    let mut client = PeerClient::connect(addr, "/").await.expect("Connect failed");
    settle().await;

    let host = start_mock_session(session_config(addr), Role::Host).await;
    client.recv_kind("offer", STEP_TIMEOUT_MS).await.expect("No offer");

    for garbage in [
        "not json at all",
        r#"{"type":"hello","content":"x"}"#,
        r#"{"type":"chat"}"#,
        r#"{"type":"answer"}"#,
        r#"{"content":"untagged"}"#,
    ] {
        client.send_raw(garbage).await.expect("Send failed");
    }
    client
        .send(&SignalMessage::chat("still here"))
        .await
        .expect("Send failed");

    let chat = host.handle.chat();
    assert!(eventually(STEP_TIMEOUT_MS, || async move { !chat.is_empty() }).await);
    assert_eq!(host.handle.messages(), vec!["still here"]);
    assert!(host.peer.remote_descriptions().await.is_empty());
    assert!(!host.handle.is_finished());

    host.handle.close().await.expect("Session ended with error");
    client.close().await.expect("Failed to close client");
}
