use crate::integration::init_tracing;
use crate::utils::{
    PeerClient, SILENCE_MS, STEP_TIMEOUT_MS, session_config, settle, spawn_relay,
    start_mock_session,
};
use onair_core::{Role, SignalMessage};

#[tokio::test]
async fn test_own_chat_is_not_logged() {
    init_tracing();

    let addr = spawn_relay().await.expect("Failed to start relay");
    let mut host = PeerClient::connect(addr, "/").await.expect("Connect failed");
    settle().await;

    let audience = start_mock_session(session_config(addr), Role::Audience).await;
    host.recv_kind("need-offer", STEP_TIMEOUT_MS)
        .await
        .expect("No need-offer");

    audience.handle.send_message("hello from the crowd");

    let Some(SignalMessage::Chat { content }) = host.recv_kind("chat", STEP_TIMEOUT_MS).await
    else {
        panic!("Chat was not sent");
    };
    assert_eq!(content, "hello from the crowd");

    tokio::time::sleep(std::time::Duration::from_millis(SILENCE_MS)).await;
    assert!(
        audience.handle.messages().is_empty(),
        "A sender's own chat never lands in its log"
    );

    audience.handle.close().await.expect("Session ended with error");
    host.close().await.expect("Failed to close client");
}
