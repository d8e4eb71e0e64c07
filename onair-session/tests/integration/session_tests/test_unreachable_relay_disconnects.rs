use crate::integration::init_tracing;
use crate::utils::{free_port, start_mock_session};
use onair_core::Role;
use onair_session::{SessionConfig, SessionState};
use std::time::Duration;

#[tokio::test]
async fn test_unreachable_relay_disconnects() {
    init_tracing();

    let port = free_port().await;
    let config = SessionConfig {
        url: format!("ws://127.0.0.1:{}", port),
        ..SessionConfig::default()
    };

    let host = start_mock_session(config, Role::Host).await;

    assert!(
        host.handle
            .wait_for_state(SessionState::Disconnected, Duration::from_secs(3))
            .await
    );
    assert!(
        !host.handle.is_finished(),
        "Losing signaling is not fatal to the session task"
    );
    assert_eq!(host.peer.offers_created().await, 0);
    assert!(host.sink.local_streams().is_empty());

    host.handle.close().await.expect("Session ended with error");
    assert!(host.peer.was_closed().await);
}
