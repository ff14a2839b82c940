use crate::integration::init_tracing;
use crate::utils::{TestPeer, TestServer};
use meshroom_core::{PeerId, ServerMessage};
use meshroom_server::ServerConfig;
use serde_json::json;

#[tokio::test]
async fn test_signal_reaches_named_recipient() {
    init_tracing();
    let server = TestServer::start().await.expect("Failed to start server");

    let mut peer_a = TestPeer::connect(&server.ws_url()).await.expect("connect A");
    let mut peer_b = TestPeer::connect(&server.ws_url()).await.expect("connect B");
    let mut bystander = TestPeer::connect(&server.ws_url()).await.expect("connect C");

    // No room needed: routing is by identity.
    let payload = json!({"type": "offer", "sdp": "v=0\r\n"});
    peer_a
        .signal(peer_b.peer_id, payload.clone())
        .await
        .expect("send signal");

    assert_eq!(
        peer_b.recv().await.expect("signal at B"),
        ServerMessage::Signal {
            sender: peer_a.peer_id,
            payload,
        }
    );
    bystander.expect_silence().await.expect("C is not addressed");
}

#[tokio::test]
async fn test_signals_keep_send_order() {
    init_tracing();
    let server = TestServer::start().await.expect("Failed to start server");
    let mut peer_a = TestPeer::connect(&server.ws_url()).await.expect("connect A");
    let mut peer_b = TestPeer::connect(&server.ws_url()).await.expect("connect B");

    for n in 0..10 {
        peer_a.signal(peer_b.peer_id, json!({"seq": n})).await.expect("send");
    }
    for n in 0..10 {
        match peer_b.recv().await.expect("signal") {
            ServerMessage::Signal { payload, .. } => assert_eq!(payload, json!({"seq": n})),
            other => panic!("unexpected frame {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_signal_to_disconnected_peer_is_dropped() {
    init_tracing();
    let server = TestServer::start().await.expect("Failed to start server");
    let mut peer_a = TestPeer::connect(&server.ws_url()).await.expect("connect A");

    peer_a
        .signal(PeerId::new(), json!("anyone there?"))
        .await
        .expect("send signal");

    // No error frame, no disconnect.
    peer_a.expect_silence().await.expect("sender hears nothing");
    assert_eq!(peer_a.join("still-alive").await.expect("join"), 1);
}

#[tokio::test]
async fn test_shared_room_policy() {
    init_tracing();
    let server = TestServer::start_with(ServerConfig {
        require_shared_room: true,
        ..Default::default()
    })
    .await
    .expect("Failed to start server");

    let mut peer_a = TestPeer::connect(&server.ws_url()).await.expect("connect A");
    let mut peer_b = TestPeer::connect(&server.ws_url()).await.expect("connect B");

    peer_a.signal(peer_b.peer_id, json!(1)).await.expect("send");
    peer_b.expect_silence().await.expect("strangers cannot signal");

    peer_a.join("r1").await.expect("join A");
    peer_b.join("r1").await.expect("join B");
    let _ = peer_a.recv().await.expect("user-joined");

    peer_a.signal(peer_b.peer_id, json!(2)).await.expect("send");
    assert!(matches!(
        peer_b.recv().await.expect("signal"),
        ServerMessage::Signal { .. }
    ));
}
