use std::time::Duration;

use axum::{routing::get, Router};
use tokio::time::{sleep, timeout};

use colabsheet::client::{SyncClient, DEFAULT_COLS, DEFAULT_ROWS};
use colabsheet::models::{CellRef, CursorPosition, ServerEvent};
use colabsheet::ws::handler::websocket_handler;
use colabsheet::ws::hub::CollabHub;

const EVENT_WAIT: Duration = Duration::from_secs(5);

/// Bind the collaboration endpoint on an ephemeral port and return its URL.
async fn start_server() -> String {
    let hub = CollabHub::spawn();
    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(hub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("ws://{}/ws", addr)
}

async fn next_event(client: &mut SyncClient) -> ServerEvent {
    timeout(EVENT_WAIT, client.next_event())
        .await
        .expect("timed out waiting for an event")
        .expect("connection closed unexpectedly")
}

#[tokio::test]
async fn edits_reach_room_peers_but_never_echo_to_the_sender() {
    let url = start_server().await;

    let mut y = SyncClient::connect(&url, "S1", "u2", "Grace", DEFAULT_ROWS, DEFAULT_COLS)
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;

    let mut x = SyncClient::connect(&url, "S1", "u1", "Ada", DEFAULT_ROWS, DEFAULT_COLS)
        .await
        .unwrap();

    // Y sees X arrive
    match next_event(&mut y).await {
        ServerEvent::UserJoined(joined) => assert_eq!(joined.user_id, "u1"),
        other => panic!("expected userJoined, got {:?}", other),
    }

    // X edits a cell; Y receives it attributed to X's join identity
    x.edit(CellRef::new(0, 0), "hello").await;
    match next_event(&mut y).await {
        ServerEvent::CellUpdated(update) => {
            assert_eq!(update.user_id, "u1");
            assert_eq!(update.display_name, "Ada");
            assert_eq!(update.cell_id, CellRef::new(0, 0));
            assert_eq!(update.value, "hello");
        }
        other => panic!("expected cellUpdated, got {:?}", other),
    }
    assert_eq!(y.state().value(&CellRef::new(0, 0)), Some("hello"));

    // Nothing comes back to X
    assert!(timeout(Duration::from_millis(300), x.next_event()).await.is_err());
}

#[tokio::test]
async fn per_sender_edit_order_is_preserved() {
    let url = start_server().await;

    let mut y = SyncClient::connect(&url, "S1", "u2", "Grace", DEFAULT_ROWS, DEFAULT_COLS)
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;

    let mut x = SyncClient::connect(&url, "S1", "u1", "Ada", DEFAULT_ROWS, DEFAULT_COLS)
        .await
        .unwrap();
    match next_event(&mut y).await {
        ServerEvent::UserJoined(_) => {}
        other => panic!("expected userJoined, got {:?}", other),
    }

    x.edit(CellRef::new(2, 2), "E1").await;
    x.edit(CellRef::new(2, 2), "E2").await;

    let mut values = Vec::new();
    for _ in 0..2 {
        match next_event(&mut y).await {
            ServerEvent::CellUpdated(update) => values.push(update.value),
            other => panic!("expected cellUpdated, got {:?}", other),
        }
    }
    assert_eq!(values, ["E1", "E2"]);
    assert_eq!(y.state().value(&CellRef::new(2, 2)), Some("E2"));
}

#[tokio::test]
async fn cursor_moves_and_departures_reach_the_room() {
    let url = start_server().await;

    let mut y = SyncClient::connect(&url, "S1", "u2", "Grace", DEFAULT_ROWS, DEFAULT_COLS)
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;

    let mut x = SyncClient::connect(&url, "S1", "u1", "Ada", DEFAULT_ROWS, DEFAULT_COLS)
        .await
        .unwrap();
    match next_event(&mut y).await {
        ServerEvent::UserJoined(_) => {}
        other => panic!("expected userJoined, got {:?}", other),
    }

    x.move_cursor(CursorPosition { row: 2, col: 3 }).await;
    match next_event(&mut y).await {
        ServerEvent::CursorMoved(moved) => {
            assert_eq!(moved.user_id, "u1");
            assert_eq!(moved.position, CursorPosition { row: 2, col: 3 });
        }
        other => panic!("expected cursorMoved, got {:?}", other),
    }
    assert_eq!(
        y.state().cursor_of("u1"),
        Some(&CursorPosition { row: 2, col: 3 })
    );

    // X's transport closes; Y is told exactly once
    drop(x);
    match next_event(&mut y).await {
        ServerEvent::UserLeft(left) => assert_eq!(left.user_id, "u1"),
        other => panic!("expected userLeft, got {:?}", other),
    }
    assert!(y.state().cursor_of("u1").is_none());
    assert!(timeout(Duration::from_millis(300), y.next_event()).await.is_err());
}

#[tokio::test]
async fn rooms_are_isolated_from_each_other() {
    let url = start_server().await;

    let mut other = SyncClient::connect(&url, "S2", "u3", "Lin", DEFAULT_ROWS, DEFAULT_COLS)
        .await
        .unwrap();
    sleep(Duration::from_millis(100)).await;

    let mut x = SyncClient::connect(&url, "S1", "u1", "Ada", DEFAULT_ROWS, DEFAULT_COLS)
        .await
        .unwrap();
    x.edit(CellRef::new(0, 0), "hello").await;

    // The S2 member sees neither the join nor the edit
    assert!(timeout(Duration::from_millis(300), other.next_event()).await.is_err());
}
