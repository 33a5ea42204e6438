mod messages_ws_service;

pub use messages_ws_service::{MessagesWsService, Registration};
