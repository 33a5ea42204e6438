use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::messages_ws::handlers;
use crate::features::messages_ws::services::MessagesWsService;

/// WebSocket route; authentication is optional and checked on handshake
pub fn routes(service: Arc<MessagesWsService>) -> Router {
    Router::new()
        .route("/ws", get(handlers::ws_handler))
        .with_state(service)
}
