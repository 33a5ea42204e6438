//! WebSocket frames.
//!
//! Every frame is a JSON text message shaped `{ "event": <name>, "data": <payload> }`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Payload of the client `new-message` event
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMessageDto {
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
}

/// Payload of the server `new-message-server` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFromServerDto {
    pub full_name: String,
    pub message: String,
}

/// Events a client may send
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    NewMessage(NewMessageDto),
}

/// Events broadcast to every connected client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Ids of all connected clients
    ClientsUpdated(Vec<Uuid>),
    NewMessageServer(MessageFromServerDto),
}
