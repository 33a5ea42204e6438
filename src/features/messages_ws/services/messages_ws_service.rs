use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Notify, RwLock};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::JwtValidator;
use crate::features::messages_ws::dtos::{ClientEvent, MessageFromServerDto, ServerEvent};

const EVENT_BUS_CAPACITY: usize = 256;
const ANONYMOUS: &str = "Anonymous";

struct ConnectedClient {
    user: Option<AuthenticatedUser>,
    /// Signalled when a newer connection of the same user replaces this one
    replaced: Arc<Notify>,
}

/// Handle returned to a socket task on registration
pub struct Registration {
    pub client_id: Uuid,
    pub replaced: Arc<Notify>,
}

/// Registry of connected sockets plus the broadcast bus they all listen on
pub struct MessagesWsService {
    clients: RwLock<HashMap<Uuid, ConnectedClient>>,
    event_bus: broadcast::Sender<ServerEvent>,
    validator: Arc<JwtValidator>,
}

impl MessagesWsService {
    pub fn new(validator: Arc<JwtValidator>) -> Self {
        let (event_bus, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            clients: RwLock::new(HashMap::new()),
            event_bus,
            validator,
        }
    }

    /// Resolve the optional handshake token; a token that is present must be valid
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Option<AuthenticatedUser>> {
        match token {
            Some(token) => self.validator.validate_token(token).await.map(Some),
            None => Ok(None),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_bus.subscribe()
    }

    /// Register a socket, closing any older socket of the same user
    pub async fn register(&self, user: Option<AuthenticatedUser>) -> Registration {
        let client_id = Uuid::new_v4();
        let replaced = Arc::new(Notify::new());

        {
            let mut clients = self.clients.write().await;

            if let Some(user_id) = user.as_ref().map(|u| u.id) {
                let previous: Vec<Uuid> = clients
                    .iter()
                    .filter(|(_, c)| c.user.as_ref().is_some_and(|u| u.id == user_id))
                    .map(|(id, _)| *id)
                    .collect();

                for id in previous {
                    if let Some(old) = clients.remove(&id) {
                        info!("Closing previous socket {} of user {}", id, user_id);
                        old.replaced.notify_one();
                    }
                }
            }

            clients.insert(
                client_id,
                ConnectedClient {
                    user,
                    replaced: Arc::clone(&replaced),
                },
            );
        }

        debug!("Socket connected: {}", client_id);
        self.publish_clients().await;

        Registration {
            client_id,
            replaced,
        }
    }

    /// Drop a socket from the registry; no-op if it was already replaced
    pub async fn unregister(&self, client_id: Uuid) {
        let removed = self.clients.write().await.remove(&client_id).is_some();

        if removed {
            debug!("Socket disconnected: {}", client_id);
            self.publish_clients().await;
        }
    }

    pub async fn connected_clients(&self) -> Vec<Uuid> {
        self.clients.read().await.keys().copied().collect()
    }

    /// Parse and act on one text frame from `client_id`
    pub async fn handle_frame(&self, client_id: Uuid, raw: &str) -> Result<()> {
        let event: ClientEvent = serde_json::from_str(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid frame: {}", e)))?;

        match event {
            ClientEvent::NewMessage(dto) => {
                dto.validate()
                    .map_err(|e| AppError::Validation(e.to_string()))?;

                let full_name = self
                    .clients
                    .read()
                    .await
                    .get(&client_id)
                    .and_then(|c| c.user.as_ref())
                    .map(|u| u.full_name.clone())
                    .unwrap_or_else(|| ANONYMOUS.to_string());

                self.publish(ServerEvent::NewMessageServer(MessageFromServerDto {
                    full_name,
                    message: dto.message,
                }));
            }
        }

        Ok(())
    }

    async fn publish_clients(&self) {
        let ids = self.connected_clients().await;
        self.publish(ServerEvent::ClientsUpdated(ids));
    }

    fn publish(&self, event: ServerEvent) {
        // Err only means nobody is listening
        let _ = self.event_bus.send(event);
    }
}
