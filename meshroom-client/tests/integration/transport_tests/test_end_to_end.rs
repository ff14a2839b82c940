use super::{EVENT_TIMEOUT_MS, start_relay, wait_for};
use crate::integration::init_tracing;
use crate::utils::{MockConnector, MockMedia, MockStream};
use meshroom_client::{MeshClient, MeshError, MeshEvent};
use meshroom_core::{PeerId, RoomId};
use serde_json::json;

#[tokio::test]
async fn test_two_clients_link_and_chat_over_websocket() {
    init_tracing();
    let (url, service) = start_relay().await;
    let room = RoomId::from("studio");

    let (alice, mut alice_events) =
        MeshClient::connect(&url, MockConnector::new(), MockMedia::new())
            .await
            .expect("alice connects");
    let MeshEvent::Identity(alice_id) =
        wait_for(&mut alice_events, EVENT_TIMEOUT_MS, |e| {
            matches!(e, MeshEvent::Identity(_))
        })
        .await
    else {
        unreachable!()
    };
    alice.handle().join_room(room.clone()).unwrap();
    wait_for(&mut alice_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, MeshEvent::RoomJoined { member_count: 1, .. })
    })
    .await;

    let (bob, mut bob_events) = MeshClient::connect(&url, MockConnector::new(), MockMedia::new())
        .await
        .expect("bob connects");
    let MeshEvent::Identity(bob_id) = wait_for(&mut bob_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, MeshEvent::Identity(_))
    })
    .await
    else {
        unreachable!()
    };
    bob.handle().join_room(room.clone()).unwrap();

    let is_stream_from = |id: PeerId| {
        move |e: &MeshEvent<MockStream>| matches!(e, MeshEvent::RemoteStreamAvailable { remote, .. } if *remote == id)
    };
    wait_for(&mut alice_events, EVENT_TIMEOUT_MS, is_stream_from(bob_id)).await;
    wait_for(&mut bob_events, EVENT_TIMEOUT_MS, is_stream_from(alice_id)).await;
    assert_eq!(service.rooms().member_count(&room), 2);

    alice.handle().chat(json!({"text": "hello bob"})).unwrap();
    let chat = wait_for(&mut bob_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, MeshEvent::Chat(_))
    })
    .await;
    assert!(matches!(chat, MeshEvent::Chat(m) if m["text"] == "hello bob"));

    bob.handle().draw(json!({"stroke": [1, 2]})).unwrap();
    wait_for(&mut alice_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, MeshEvent::Draw(p) if p["stroke"][1] == 2)
    })
    .await;

    alice.close().await;
    wait_for(&mut bob_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, MeshEvent::RemoteStreamRemoved { remote } if *remote == alice_id)
    })
    .await;
    wait_for(&mut bob_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, MeshEvent::MemberCount(1))
    })
    .await;

    bob.close().await;
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = MeshClient::connect(
        &format!("ws://{}/ws", addr),
        MockConnector::new(),
        MockMedia::new(),
    )
    .await;
    assert!(matches!(result, Err(MeshError::WebSocket(_))));
}
