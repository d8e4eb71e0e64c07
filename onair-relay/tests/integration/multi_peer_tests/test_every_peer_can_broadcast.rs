use onair_relay::Frame;
use std::time::Duration;

use crate::integration::{create_test_room, init_tracing, join_peer};

#[tokio::test]
async fn test_every_peer_can_broadcast() {
    init_tracing();

    let room = create_test_room();
    let peer_count = 5;

    let mut peers = Vec::new();
    for _ in 0..peer_count {
        peers.push(join_peer(&room, 16).await);
    }

    for (i, (peer_id, _)) in peers.iter().enumerate() {
        room.relay(*peer_id, Frame::Text(format!("from {}", i)))
            .await
            .unwrap();
    }

    for (i, (_, rx)) in peers.iter_mut().enumerate() {
        let mut received = Vec::new();
        for _ in 0..peer_count - 1 {
            let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("Timed out waiting for a relayed frame")
                .expect("Room dropped the peer");
            received.push(frame);
        }

        assert!(
            !received.contains(&Frame::Text(format!("from {}", i))),
            "Peer {} must not receive its own frame",
            i
        );
        assert!(rx.try_recv().is_err(), "Peer {} got an extra frame", i);
    }
}
