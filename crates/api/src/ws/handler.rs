use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use placement_core::roles;
use placement_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Browsers cannot set headers on a WebSocket handshake, so the access
/// token travels in the query string.
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub token: String,
}

/// GET /api/v1/ws?token=...
///
/// An invalid token gets a 401 and no socket. Student sockets receive their
/// own `student-{id}` notifications; every socket receives broadcasts.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
) -> AppResult<impl IntoResponse> {
    let user = AuthUser::from_token(&query.token, &state.config.jwt)?;
    let student_id = roles::is_student(&user.role).then_some(user.user_id);

    Ok(ws.on_upgrade(move |socket| serve_socket(socket, state.ws_manager, student_id)))
}

async fn serve_socket(socket: WebSocket, ws_manager: Arc<WsManager>, student_id: Option<DbId>) {
    let (conn_id, mut outbox) = ws_manager.register(student_id).await;
    tracing::info!(%conn_id, ?student_id, "WebSocket connected");

    let (mut sink, mut inbound) = socket.split();

    let forward = tokio::spawn(async move {
        while let Some(message) = outbox.recv().await {
            let closing = matches!(message, Message::Close(_));
            if sink.send(message).await.is_err() || closing {
                break;
            }
        }
    });

    // Clients only listen. Anything but Close or an error is ignored.
    while let Some(frame) = inbound.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    let open_for = ws_manager.unregister(conn_id).await;
    forward.abort();
    tracing::info!(
        %conn_id,
        open_secs = open_for.map(|d| d.num_seconds()),
        "WebSocket disconnected",
    );
}
