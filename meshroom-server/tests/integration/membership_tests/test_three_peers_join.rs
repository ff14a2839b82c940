use crate::integration::init_tracing;
use crate::utils::{TestPeer, TestServer};
use meshroom_core::ServerMessage;

#[tokio::test]
async fn test_three_peers_join() {
    init_tracing();
    let server = TestServer::start().await.expect("Failed to start server");

    let mut peer1 = TestPeer::connect(&server.ws_url()).await.expect("connect 1");
    let mut peer2 = TestPeer::connect(&server.ws_url()).await.expect("connect 2");
    let mut peer3 = TestPeer::connect(&server.ws_url()).await.expect("connect 3");

    assert_eq!(peer1.join("party").await.expect("join 1"), 1);
    assert_eq!(peer2.join("party").await.expect("join 2"), 2);
    assert_eq!(peer3.join("party").await.expect("join 3"), 3);

    let mut seen_by_1 = Vec::new();
    for _ in 0..2 {
        match peer1.recv().await.expect("peer 1 frame") {
            ServerMessage::UserJoined {
                user_id,
                user_count,
                ..
            } => seen_by_1.push((user_id, user_count)),
            other => panic!("unexpected frame {:?}", other),
        }
    }
    assert_eq!(seen_by_1, vec![(peer2.peer_id, 2), (peer3.peer_id, 3)]);

    match peer2.recv().await.expect("peer 2 frame") {
        ServerMessage::UserJoined {
            user_id,
            user_count,
            ..
        } => {
            assert_eq!(user_id, peer3.peer_id);
            assert_eq!(user_count, 3);
        }
        other => panic!("unexpected frame {:?}", other),
    }

    peer3.expect_silence().await.expect("newest member hears nothing");
    assert_eq!(server.service.rooms().member_count(&"party".into()), 3);
}
