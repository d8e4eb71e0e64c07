use crate::integration::init_tracing;
use crate::utils::{
    PeerClient, STEP_TIMEOUT_MS, eventually, session_config, settle, spawn_relay,
    start_mock_session,
};
use onair_core::Role;
use onair_session::SessionState;

#[tokio::test]
async fn test_close_returns_to_idle() {
    init_tracing();

    let addr = spawn_relay().await.expect("Failed to start relay");
    let mut audience = PeerClient::connect(addr, "/").await.expect("Connect failed");
    settle().await;

    let host = start_mock_session(session_config(addr), Role::Host).await;
    audience
        .recv_kind("offer", STEP_TIMEOUT_MS)
        .await
        .expect("No offer");

    let state = host.handle.watch_state();
    host.handle.close().await.expect("Session ended with error");

    assert_eq!(*state.borrow(), SessionState::Idle);
    assert!(host.peer.was_closed().await);
    assert_eq!(host.sink.detach_count(), 1);

    audience.close().await.expect("Failed to close client");
}

#[tokio::test]
async fn test_dropping_handle_ends_session() {
    init_tracing();

    let addr = spawn_relay().await.expect("Failed to start relay");
    let session = start_mock_session(session_config(addr), Role::Audience).await;

    let state = session.handle.watch_state();
    drop(session.handle);

    let state = &state;
    assert!(
        eventually(STEP_TIMEOUT_MS, || async move {
            *state.borrow() == SessionState::Idle
        })
        .await,
        "Session must wind down once the handle is gone"
    );
    assert!(session.peer.was_closed().await);
}
