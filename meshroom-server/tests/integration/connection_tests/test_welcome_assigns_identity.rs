use crate::integration::init_tracing;
use crate::utils::{TestPeer, TestServer};
use meshroom_core::ServerMessage;

#[tokio::test]
async fn test_welcome_assigns_identity() {
    init_tracing();
    let server = TestServer::start().await.expect("Failed to start server");

    let peer1 = TestPeer::connect(&server.ws_url())
        .await
        .expect("Failed to connect peer 1");
    let peer2 = TestPeer::connect(&server.ws_url())
        .await
        .expect("Failed to connect peer 2");

    assert_ne!(peer1.peer_id, peer2.peer_id, "Identities must be unique");
    assert!(server.service.connections().is_connected(&peer1.peer_id));
    assert!(server.service.connections().is_connected(&peer2.peer_id));

    peer1.close().await.expect("Failed to close peer 1");
    peer2.close().await.expect("Failed to close peer 2");
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    init_tracing();
    let server = TestServer::start().await.expect("Failed to start server");
    let mut peer = TestPeer::connect(&server.ws_url()).await.expect("connect");

    peer.send_raw("{\"type\":\"shout\"}").await.expect("send");
    let frame = peer.recv().await.expect("error frame");
    assert!(matches!(frame, ServerMessage::Error { .. }), "got {:?}", frame);

    // Still usable afterwards.
    assert_eq!(peer.join("after-error").await.expect("join"), 1);
}
