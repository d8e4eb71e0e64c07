use crate::integration::init_tracing;
use crate::utils::{
    PeerClient, SILENCE_MS, free_port, spawn_relay_on, start_mock_session,
};
use onair_core::Role;
use onair_session::{ReconnectPolicy, SessionConfig, SessionState};
use std::time::Duration;

#[tokio::test]
async fn test_reconnects_when_relay_appears() {
    init_tracing();

    let port = free_port().await;
    let config = SessionConfig {
        url: format!("ws://127.0.0.1:{}", port),
        reconnect: Some(ReconnectPolicy {
            max_attempts: 100,
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_millis(200),
        }),
        // Keeps re-asking for an offer, so the client sees one whenever it joins.
        negotiation_timeout: Some(Duration::from_millis(300)),
        ..SessionConfig::default()
    };

    let audience = start_mock_session(config, Role::Audience).await;
    assert!(
        audience
            .handle
            .wait_for_state(SessionState::Disconnected, Duration::from_secs(3))
            .await
    );

    // Chat while signaling is down is dropped, not queued.
    audience.handle.send_message("lost");

    let addr = spawn_relay_on(&format!("127.0.0.1:{}", port))
        .await
        .expect("Failed to start relay");
    let mut host = PeerClient::connect(addr, "/").await.expect("Connect failed");

    assert!(
        host.recv_kind("need-offer", 5000).await.is_some(),
        "Audience must reconnect and ask for an offer again"
    );
    assert!(
        host.never_receives("chat", SILENCE_MS).await,
        "Chat sent while disconnected must not be delivered later"
    );
    assert!(!audience.handle.is_finished());

    audience.handle.close().await.expect("Session ended with error");
    host.close().await.expect("Failed to close client");
}
