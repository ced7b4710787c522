//! Command validation and error replies over WebSocket.

mod fixtures;

use std::time::Duration;

use fixtures::{TestClient, TestServer};
use serde_json::json;

#[tokio::test]
async fn test_malformed_json_gets_error_reply() {
    // テスト項目: JSON として不正なフレームには Invalid command が返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client.send_raw("this is not json").await;

    // then (期待する結果):
    let reply = client.recv_json().await;
    assert_eq!(reply["type"], "error");
    assert!(
        reply["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid command: ")
    );
}

#[tokio::test]
async fn test_unknown_command_gets_no_reply() {
    // テスト項目: 未知の type のコマンドは無視され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client.send_json(json!({"type": "teleport"})).await;

    // then (期待する結果):
    client.expect_silence(Duration::from_millis(200)).await;
    let room_id = client.create_room().await;
    assert!(!room_id.is_empty());
}

#[tokio::test]
async fn test_commands_on_missing_room() {
    // テスト項目: 存在しない Room への操作には "Room not found" が返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client
        .send_json(json!({"type": "set-video", "roomId": "nothere1", "videoUrl": "v1"}))
        .await;

    // then (期待する結果):
    assert_eq!(
        client.recv_json().await,
        json!({"type": "error", "message": "Room not found"})
    );
}

#[tokio::test]
async fn test_invalid_playback_position_is_rejected() {
    // テスト項目: 負の再生位置は Invalid command として拒否され、他のメンバーには届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let room_id = alice.create_room().await;
    alice.join_room(&room_id).await;
    let mut bob = TestClient::connect(&server).await;
    bob.join_room(&room_id).await;
    bob.recv_type("participant-count").await;

    // when (操作):
    alice
        .send_json(json!({
            "type": "video-sync",
            "roomId": room_id,
            "event": {"type": "play", "timestamp": -1.0},
        }))
        .await;

    // then (期待する結果):
    let reply = alice.recv_type("error").await;
    assert!(
        reply["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid command: ")
    );
    bob.expect_silence(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_check_room() {
    // テスト項目: check-room で Room の存在有無を確認できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;
    let room_id = client.create_room().await;

    // when (操作):
    client
        .send_json(json!({"type": "check-room", "roomId": room_id}))
        .await;
    client
        .send_json(json!({"type": "check-room", "roomId": "nothere1"}))
        .await;

    // then (期待する結果):
    assert_eq!(
        client.recv_json().await,
        json!({"type": "room-check-result", "roomId": room_id, "exists": true})
    );
    assert_eq!(
        client.recv_json().await,
        json!({"type": "room-check-result", "roomId": "nothere1", "exists": false})
    );
}
