//! WebSocket connection handlers.

use std::{future::Future, sync::Arc};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::{Mutex, mpsc, oneshot};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, DisplayName, SessionState},
    infrastructure::dto::{conversion::decode_client_message, websocket::ClientMessage},
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Joins immediately when present
    pub name: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let connection_id = ConnectionIdFactory::generate();
    tracing::info!("Connection '{}' opened", connection_id);

    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, query.name))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver fed by the MessagePusher
/// * `sender` - WebSocket sink of this connection
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    initial_name: Option<String>,
) {
    let (sender, mut receiver) = socket.split();

    // Outbound channel is registered before any event can be addressed to it
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(connection_id.clone(), tx)
        .await;
    let mut send_task = pusher_loop(rx, sender);

    let session = Arc::new(Mutex::new(SessionState::default()));

    if let Some(raw_name) = initial_name {
        handle_join(&state, &session, &connection_id, &raw_name).await;
    }

    let (stop_tx, stop_rx) = oneshot::channel();
    let state_clone = state.clone();
    let session_clone = session.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        receive_loop(receiver, stop_rx, &connection_id_clone, |text| {
            handle_text(&state_clone, &session_clone, &connection_id_clone, text)
        })
        .await;
    });

    // If the socket can no longer be written, let the frame in progress finish
    let send_finished = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => true,
    };
    if send_finished {
        let _ = stop_tx.send(());
        if let Err(e) = recv_task.await {
            tracing::error!("Receive task of '{}' failed: {}", connection_id, e);
        }
    } else {
        send_task.abort();
    }

    state.message_pusher.unregister_client(&connection_id).await;

    let name = {
        let mut session = session.lock().await;
        let name = session.display_name().cloned();
        if session.mark_disconnected().is_err() {
            return;
        }
        name
    };
    state.coordinator.on_disconnect(&connection_id).await;
    match name {
        Some(name) => tracing::info!("Connection '{}' of '{}' closed", connection_id, name),
        None => tracing::info!("Connection '{}' closed before joining", connection_id),
    }
}

/// Hands each text frame to `handle` until the client closes or `stop` fires.
///
/// `stop` is only observed between frames, so a frame already being handled
/// (a persist followed by its broadcast) always runs to completion.
async fn receive_loop<S, F, Fut>(
    mut frames: S,
    mut stop: oneshot::Receiver<()>,
    connection_id: &ConnectionId,
    mut handle: F,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        let msg = tokio::select! {
            msg = frames.next() => msg,
            _ = &mut stop => {
                tracing::debug!("Receive loop of '{}' stopped", connection_id);
                break;
            }
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => handle(text.as_str().to_owned()).await,
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            // Ping/pong is handled by the WebSocket protocol
            _ => {}
        }
    }
}

async fn handle_text(
    state: &AppState,
    session: &Mutex<SessionState>,
    connection_id: &ConnectionId,
    text: String,
) {
    let frame = match decode_client_message(&text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Ignoring unparsable frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match frame {
        ClientMessage::Join { name } => handle_join(state, session, connection_id, &name).await,
        ClientMessage::Send { user, message } => {
            if let Err(e) = session.lock().await.ensure_can_send() {
                tracing::warn!("Ignoring send from '{}': {}", connection_id, e);
                return;
            }
            if let Err(e) = state.coordinator.on_send(&user, &message).await {
                tracing::error!("Failed to send message from '{}': {}", connection_id, e);
            }
        }
    }
}

async fn handle_join(
    state: &AppState,
    session: &Mutex<SessionState>,
    connection_id: &ConnectionId,
    raw_name: &str,
) {
    // Held across the join so a concurrent frame sees a settled state
    let mut session = session.lock().await;
    if let Err(e) = session.ensure_can_join() {
        tracing::warn!("Ignoring join from '{}': {}", connection_id, e);
        return;
    }

    // The registry entry exists even when a later delivery step fails
    let name = match state.coordinator.on_join(connection_id.clone(), raw_name).await {
        Ok(name) => name,
        Err(e) => {
            tracing::error!("Join of '{}' did not complete: {}", connection_id, e);
            DisplayName::normalize(raw_name)
        }
    };

    if let Err(e) = session.mark_joined(name) {
        tracing::warn!("Session of '{}' rejected join: {}", connection_id, e);
    }
}
