mod support;

use std::sync::Arc;
use std::time::Duration;

use pose_arena::oracle::{ImageFrame, ScriptedOracle};
use serde_json::{json, Value};
use support::server::{start_test_server, wait_for_sockets, ws_url};
use support::websocket_client::WebSocketClient;
use support::{build_test_state, names};

const WAIT: Duration = Duration::from_secs(2);

#[actix_web::test]
async fn push_delivers_lobby_start_and_snapshots_equal_to_pull() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(ScriptedOracle::constant("Arms Up", 0.3)));
    let coordinator = state.coordinator.clone();
    let (server, addr) = start_test_server(state).await?;

    let host = coordinator.open_connection();
    let mut client = WebSocketClient::connect(&ws_url(addr, host)).await?;

    let hello = client.recv_type("hello").await.expect("hello");
    assert_eq!(hello["connection_id"], json!(host.to_string()));
    let lobby = client.recv_type("lobby_update").await.expect("initial lobby");
    assert_eq!(lobby["groups"], json!([]));
    wait_for_sockets(coordinator.hub(), 1, WAIT).await?;

    coordinator.create_group(host, &names(&["Ana", "Bo"]))?;
    let lobby = client.recv_type("lobby_update").await.expect("lobby after create");
    assert_eq!(lobby["groups"][0]["names"], json!(["Ana", "Bo"]));

    coordinator.start_session(host)?;
    client.recv_type("game_started").await.expect("game_started");
    let ready = client
        .recv_update_where(|s| s["myGroupState"]["state"] == "READY_FOR_NEXT_TURN")
        .await
        .expect("ready snapshot");

    // Push and pull render through the same path.
    let pulled = serde_json::to_value(coordinator.snapshot_for(Some(host))?)?;
    assert_eq!(ready, pulled);

    let ana = coordinator.snapshot_for(Some(host))?.my_group_state.players[0].id;
    coordinator.start_turn(host, ana)?;
    coordinator
        .submit_frame(host, ana, ImageFrame::new("image/png", vec![1, 2, 3]))
        .await?;
    let scored = client
        .recv_update_where(|s| s["myGroupState"]["players"][0]["score"] == json!(30.0))
        .await
        .expect("scored snapshot");
    assert_eq!(scored["myGroupState"]["state"], "PLAYING");

    coordinator.reset_session(Some(host))?;
    client.recv_type("session_reset").await.expect("session_reset");
    let lobby = client.recv_type("lobby_update").await.expect("lobby after reset");
    assert_eq!(lobby["groups"], json!([]));

    client.close().await?;
    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn pushed_markers_strictly_increase() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(ScriptedOracle::constant("Arms Up", 0.3)));
    let coordinator = state.coordinator.clone();
    let (server, addr) = start_test_server(state).await?;

    let host = coordinator.open_connection();
    coordinator.create_group(host, &names(&["Ana", "Bo"]))?;
    coordinator.start_session(host)?;

    let mut client = WebSocketClient::connect(&ws_url(addr, host)).await?;
    wait_for_sockets(coordinator.hub(), 1, WAIT).await?;

    let ana = coordinator.snapshot_for(Some(host))?.my_group_state.players[0].id;
    coordinator.start_turn(host, ana)?;
    for _ in 0..5 {
        coordinator.tick();
    }

    let mut markers = Vec::new();
    while let Some(msg) = client.recv_type("game_update").await {
        let snapshot = &msg["snapshot"];
        let marker = (
            snapshot["myGroupState"]["version"].as_u64().unwrap_or_default(),
            snapshot["tick"].as_u64().unwrap_or_default(),
        );
        markers.push(marker);
        if snapshot["myGroupState"]["state"] == "ROUND_OVER" {
            break;
        }
    }

    assert!(markers.len() >= 2, "expected several updates, got {markers:?}");
    for pair in markers.windows(2) {
        assert!(pair[1] > pair[0], "marker did not advance: {pair:?}");
        assert!(pair[1].0 >= pair[0].0 && pair[1].1 >= pair[0].1);
    }

    client.close().await?;
    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn closing_last_socket_leaves_the_lobby() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(ScriptedOracle::constant("Arms Up", 0.3)));
    let coordinator = state.coordinator.clone();
    let (server, addr) = start_test_server(state).await?;

    let host = coordinator.open_connection();
    let guest = coordinator.open_connection();
    coordinator.create_group(host, &names(&["Ana"]))?;
    coordinator.create_group(guest, &names(&["Bo"]))?;

    let mut first = WebSocketClient::connect(&ws_url(addr, host)).await?;
    let mut second = WebSocketClient::connect(&ws_url(addr, host)).await?;
    let mut watcher = WebSocketClient::connect(&ws_url(addr, guest)).await?;
    wait_for_sockets(coordinator.hub(), 3, WAIT).await?;

    first.close().await?;
    wait_for_sockets(coordinator.hub(), 2, WAIT).await?;
    assert_eq!(coordinator.list_groups().len(), 2);

    second.close().await?;
    wait_for_sockets(coordinator.hub(), 1, WAIT).await?;

    let lobby = watcher
        .recv_type_where("lobby_update", |m| m["groups"].as_array().is_some_and(|g| g.len() == 1))
        .await
        .expect("lobby without host group");
    assert_eq!(lobby["groups"][0]["names"], json!(["Bo"]));
    assert_eq!(lobby["groups"][0]["isHost"], true);

    watcher.close().await?;
    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn resync_and_protocol_errors() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(ScriptedOracle::constant("Arms Up", 0.3)));
    let coordinator = state.coordinator.clone();
    let (server, addr) = start_test_server(state).await?;

    let lonely = coordinator.open_connection();
    let mut client = WebSocketClient::connect(&ws_url(addr, lonely)).await?;
    client.recv_type("lobby_update").await.expect("lobby");

    client.send_json(&json!({"type": "resync"})).await?;
    let err = client.recv_type("error").await.expect("not in group");
    assert_eq!(err["code"], "not_in_group");

    coordinator.create_group(lonely, &names(&["Ana"]))?;
    client.send_json(&json!({"type": "resync"})).await?;
    let update = client.recv_type("game_update").await.expect("resync snapshot");
    assert_eq!(update["snapshot"]["myGroupState"]["players"][0]["name"], "Ana");

    client.send_json(&json!({"type": "hello", "protocol": 99})).await?;
    let err: Value = client.recv_type("error").await.expect("bad protocol");
    assert_eq!(err["code"], "bad_protocol");

    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn last_champion_pushes_game_over_to_every_group() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(ScriptedOracle::constant("Arms Up", 0.96)));
    let coordinator = state.coordinator.clone();
    let (server, addr) = start_test_server(state).await?;

    // Cycle policy: the first group draws "Arms Up", the second "T Pose".
    let host = coordinator.open_connection();
    let guest = coordinator.open_connection();
    coordinator.create_group(host, &names(&["Ana"]))?;
    coordinator.create_group(guest, &names(&["Bo"]))?;
    coordinator.start_session(host)?;

    let mut early = WebSocketClient::connect(&ws_url(addr, guest)).await?;
    wait_for_sockets(coordinator.hub(), 1, WAIT).await?;

    // Bo's timer runs out; alone in the group, Bo is crowned.
    let bo = coordinator.snapshot_for(Some(guest))?.my_group_state.players[0].id;
    coordinator.start_turn(guest, bo)?;
    for _ in 0..3 {
        coordinator.tick();
    }
    let crowned = early
        .recv_update_where(|s| s["myGroupState"]["state"] == "CHAMPION_SELECTED")
        .await
        .expect("bo crowned");
    assert_eq!(crowned["gamePhase"], "GROUP_STAGE");
    let crowned_tick = crowned["tick"].as_u64().unwrap_or_default();

    // Ana meets the objective; that ends the session with no further tick.
    let ana = coordinator.snapshot_for(Some(host))?.my_group_state.players[0].id;
    coordinator.start_turn(host, ana)?;
    let outcome = coordinator
        .submit_frame(host, ana, ImageFrame::new("image/png", vec![1, 2, 3]))
        .await?;
    assert!(outcome.accepted());

    let over = early
        .recv_update_where(|s| s["gamePhase"] == "GAME_OVER")
        .await
        .expect("game over pushed to the group crowned earlier");
    assert_eq!(over["myGroupState"]["champion"]["name"], "Bo");
    assert!(over["tick"].as_u64().unwrap_or_default() > crowned_tick);

    // Pull sees the same marker, so a cached ETag no longer matches.
    let pulled = serde_json::to_value(coordinator.snapshot_for(Some(guest))?)?;
    assert_eq!(over, pulled);

    early.close().await?;
    server.stop(true).await;
    Ok(())
}
