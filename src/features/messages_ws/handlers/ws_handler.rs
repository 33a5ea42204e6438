use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use utoipa::IntoParams;

use crate::core::error::AppError;
use crate::core::extractor::AppQuery;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::messages_ws::services::MessagesWsService;

/// Handshake header carrying the optional token
const AUTH_HEADER: &str = "authentication";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WsQuery {
    /// Token for clients that cannot set handshake headers
    pub token: Option<String>,
}

fn handshake_token<'a>(headers: &'a HeaderMap, query: &'a WsQuery) -> Option<&'a str> {
    headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim())
        .or(query.token.as_deref())
        .filter(|t| !t.is_empty())
}

/// Open the chat socket
///
/// Upgrades to a WebSocket. A token is optional; anonymous clients post
/// as "Anonymous".
#[utoipa::path(
    get,
    path = "/ws",
    params(WsQuery),
    responses(
        (status = 101, description = "Switching protocols"),
        (status = 401, description = "Token present but not valid")
    ),
    tag = "messages-ws"
)]
pub async fn ws_handler(
    State(service): State<Arc<MessagesWsService>>,
    headers: HeaderMap,
    AppQuery(query): AppQuery<WsQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AppError> {
    let user = service
        .authenticate(handshake_token(&headers, &query))
        .await?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, service, user)))
}

async fn handle_socket(
    socket: WebSocket,
    service: Arc<MessagesWsService>,
    user: Option<AuthenticatedUser>,
) {
    let mut events = service.subscribe();
    let registration = service.register(user).await;
    let client_id = registration.client_id;
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            _ = registration.replaced.notified() => {
                info!("Socket {} replaced by a newer connection", client_id);
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("Failed to encode event: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(count)) => {
                    warn!("Socket {} lagged by {} events", client_id, count);
                }
                Err(RecvError::Closed) => break,
            },
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = service.handle_frame(client_id, text.as_str()).await {
                        warn!("Ignoring frame from {}: {}", client_id, e);
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("Socket {} errored: {}", client_id, e);
                    break;
                }
            },
        }
    }

    service.unregister(client_id).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_handshake_token_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_static("Bearer abc"));
        let query = WsQuery {
            token: Some("xyz".to_string()),
        };
        assert_eq!(handshake_token(&headers, &query), Some("abc"));

        let headers = HeaderMap::new();
        assert_eq!(handshake_token(&headers, &query), Some("xyz"));

        let query = WsQuery {
            token: Some(String::new()),
        };
        assert_eq!(handshake_token(&headers, &query), None);
    }
}
