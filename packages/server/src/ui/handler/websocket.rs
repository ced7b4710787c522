//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::ConnectionId,
    ui::{
        shutdown::{SHUTDOWN_CLOSE_REASON, ShutdownCoordinator, ShutdownPhase},
        state::AppState,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn close_frame(code: u16) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: Utf8Bytes::from_static(SHUTDOWN_CLOSE_REASON),
    }))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Once the server reaches [`ShutdownPhase::Stopped`], whatever is still
/// queued is flushed and the socket is closed with code 1001.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events addressed to this connection
/// * `sender` - WebSocket sink to send messages to this client
/// * `shutdown` - Shutdown state shared with the server
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    shutdown: ShutdownCoordinator,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                _ = shutdown.wait_for(ShutdownPhase::Stopped) => {
                    while let Ok(msg) = rx.try_recv() {
                        if sender.send(Message::Text(msg.into())).await.is_err() {
                            return;
                        }
                    }
                    let _ = sender.send(close_frame(close_code::AWAY)).await;
                    break;
                }
            }
        }
    })
}

/// Close a socket that arrived while the server is draining
async fn refuse_connection(mut socket: WebSocket) {
    tracing::info!("Refusing new connection: server is shutting down");
    if let Err(e) = socket.send(close_frame(close_code::AGAIN)).await {
        tracing::debug!("Failed to send close frame to refused connection: {}", e);
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    if state.shutdown.is_draining() {
        refuse_connection(socket).await;
        return;
    }

    // Create a channel for this connection to receive events
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = state
        .connect_participant_usecase
        .execute(connection_id, tx)
        .await
    {
        tracing::warn!("Rejecting connection: {}", e);
        return;
    }
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();
    let router = state.command_router.clone();
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    // Spawn a task to receive commands from this client.
    // Only the wait for the next frame is cancellable; a command that has
    // started always runs to completion.
    let mut recv_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                msg = receiver.next() => msg,
                _ = &mut stop_rx => break,
            };
            let msg = match msg {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
                None => break,
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id, text.as_str());
                    router.handle(connection_id, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to deliver queued events to this client
    let mut send_task = pusher_loop(rx, sender, state.shutdown.clone());

    // The writer can be aborted at any point. The reader is asked to stop and
    // awaited so the disconnect below sees the result of its last command.
    let reader_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    if reader_finished {
        send_task.abort();
    } else {
        let _ = stop_tx.send(());
        if let Err(e) = recv_task.await {
            tracing::debug!("Reader task for '{}' ended abnormally: {}", connection_id, e);
        }
    }

    match state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        Some(room_id) => tracing::info!(
            "Connection '{}' closed and left room '{}'",
            connection_id,
            room_id
        ),
        None => tracing::info!("Connection '{}' closed", connection_id),
    }
}
