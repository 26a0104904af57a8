use axum::{
    extract::{Extension, ws::{WebSocket, WebSocketUpgrade, Message}},
    response::IntoResponse,
};
use sqlx::{SqlitePool};
use tokio::sync::broadcast;
use tracing::{info, error};
use crate::dto::{draft_dto::{DraftState, UpdateDraft, UpdateTimer}, team_dto::{Team, TeamsUpdate}, character_dto::{Character, CharactersUpdate}};
use crate::services::turn_timer::TurnTimerState;
use futures_util::{StreamExt, SinkExt};

fn broadcast_json<T: serde::Serialize>(tx: &broadcast::Sender<String>, kind: &str, message: &T) {
    match serde_json::to_string(message) {
        Ok(json) => {
            // No subscribers is fine.
            let _ = tx.send(json);
        }
        Err(e) => {
            error!("Failed to serialize {} message: {}", kind, e);
        }
    }
}

pub async fn send_team_update(pool: &SqlitePool, tx: &broadcast::Sender<String>) {
    let teams = sqlx::query_as::<_, Team>("SELECT * FROM teams ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap_or_default();

    let update = TeamsUpdate {
        r#type: "teams_update".to_string(),
        teams
    };

    broadcast_json(tx, "teams_update", &update);
}

pub fn send_characters_update(tx: &broadcast::Sender<String>, characters: Vec<Character>) {
    let update = CharactersUpdate {
        r#type: "characters_update".to_string(),
        characters,
    };

    broadcast_json(tx, "characters_update", &update);
}

pub fn send_draft_update(tx: &broadcast::Sender<String>, state: &DraftState) {
    let update_msg = UpdateDraft {
        r#type: "draft_update".to_string(),
        draft_state: state.clone(),
    };

    broadcast_json(tx, "draft_update", &update_msg);
}

pub fn send_timer_update(tx: &broadcast::Sender<String>, draft_id: &str, timer: &TurnTimerState) {
    let update_msg = UpdateTimer {
        r#type: "timer_update".to_string(),
        draft_id: draft_id.to_string(),
        timer: *timer,
    };

    broadcast_json(tx, "timer_update", &update_msg);
}

/* Web Socket stuff */
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Extension(tx): Extension<broadcast::Sender<String>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, tx))
}

async fn handle_socket(socket: WebSocket, tx: broadcast::Sender<String>) {
    info!("WebSocket client connected.");
    let (mut sender, mut receiver) = socket.split();
    let mut rx = tx.subscribe();

    // Task to send messages to this client
    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                // A slow client missed some updates, the next one carries full state.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Clients only listen, drain until they hang up.
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }

    // Clean up
    send_task.abort();
    info!("WebSocket client disconnected.");
}
