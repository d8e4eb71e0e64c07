use crate::integration::init_tracing;
use crate::utils::{
    PeerClient, STEP_TIMEOUT_MS, eventually, session_config, settle, spawn_relay,
    start_mock_session,
};
use onair_core::{Role, SignalMessage};

#[tokio::test]
async fn test_late_joiner_gets_fresh_offer() {
    init_tracing();

    let addr = spawn_relay().await.expect("Failed to start relay");
    let mut first = PeerClient::connect(addr, "/").await.expect("Connect failed");
    settle().await;

    let host = start_mock_session(session_config(addr), Role::Host).await;

    let Some(SignalMessage::Offer { sdp: first_offer }) =
        first.recv_kind("offer", STEP_TIMEOUT_MS).await
    else {
        panic!("No initial offer");
    };
    first
        .send(&SignalMessage::Answer {
            sdp: "v=0\r\n".to_owned(),
        })
        .await
        .expect("Send failed");
    let peer = &host.peer;
    assert!(
        eventually(STEP_TIMEOUT_MS, || async move {
            peer.remote_descriptions().await.len() == 1
        })
        .await,
        "Host never applied the answer"
    );

    let mut late = PeerClient::connect(addr, "/").await.expect("Connect failed");
    settle().await;

    for _ in 0..2 {
        late.send(&SignalMessage::NeedOffer).await.expect("Send failed");

        let Some(SignalMessage::Offer { sdp }) = late.recv_kind("offer", STEP_TIMEOUT_MS).await
        else {
            panic!("Late joiner got no offer");
        };
        assert_ne!(sdp, first_offer, "Each need-offer gets a freshly created offer");
    }

    assert_eq!(host.peer.offers_created().await, 3);
    assert!(
        !host.peer.was_closed().await,
        "Renegotiation must not tear the peer connection down"
    );
    assert!(!host.handle.is_finished());

    host.handle.close().await.expect("Session ended with error");
    first.close().await.expect("Failed to close client");
    late.close().await.expect("Failed to close client");
}
