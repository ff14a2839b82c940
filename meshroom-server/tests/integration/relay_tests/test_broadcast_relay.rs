use crate::integration::init_tracing;
use crate::utils::{TestPeer, TestServer};
use meshroom_core::{ClientMessage, RoomId, ServerMessage};
use serde_json::json;

#[tokio::test]
async fn test_draw_and_clear_reach_other_members() {
    init_tracing();
    let server = TestServer::start().await.expect("Failed to start server");

    let mut peer1 = TestPeer::connect(&server.ws_url()).await.expect("connect 1");
    let mut peer2 = TestPeer::connect(&server.ws_url()).await.expect("connect 2");
    let mut outsider = TestPeer::connect(&server.ws_url()).await.expect("connect 3");

    peer1.join("canvas").await.expect("join 1");
    peer2.join("canvas").await.expect("join 2");
    outsider.join("elsewhere").await.expect("join 3");
    let _ = peer1.recv().await.expect("user-joined");

    let stroke = json!({"x0": 0, "y0": 0, "x1": 10, "y1": 10, "color": "#000"});
    peer1
        .send(&ClientMessage::Draw {
            room_id: RoomId::from("canvas"),
            payload: stroke.clone(),
        })
        .await
        .expect("draw");
    peer1
        .send(&ClientMessage::ClearCanvas {
            room_id: RoomId::from("canvas"),
        })
        .await
        .expect("clear");

    assert_eq!(
        peer2.recv().await.expect("draw at 2"),
        ServerMessage::Draw { payload: stroke }
    );
    assert_eq!(peer2.recv().await.expect("clear at 2"), ServerMessage::ClearCanvas);

    peer1.expect_silence().await.expect("sender gets no echo");
    outsider.expect_silence().await.expect("other rooms are untouched");
}

#[tokio::test]
async fn test_chat_message_is_relayed_untouched() {
    init_tracing();
    let server = TestServer::start().await.expect("Failed to start server");

    let mut peer1 = TestPeer::connect(&server.ws_url()).await.expect("connect 1");
    let mut peer2 = TestPeer::connect(&server.ws_url()).await.expect("connect 2");
    peer1.join("chat").await.expect("join 1");
    peer2.join("chat").await.expect("join 2");
    let _ = peer1.recv().await.expect("user-joined");

    let message = json!({"id": 7, "text": "hi", "sender": "You", "timestamp": 1, "extra": [1]});
    peer2
        .send(&ClientMessage::ChatMessage {
            room_id: RoomId::from("chat"),
            message: message.clone(),
        })
        .await
        .expect("chat");

    assert_eq!(
        peer1.recv().await.expect("chat at 1"),
        ServerMessage::ChatMessage { message }
    );
}
