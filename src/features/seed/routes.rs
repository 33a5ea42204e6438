use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::seed::handlers;
use crate::features::seed::services::SeedService;

/// Create routes for the seed feature (JWT required, admin only)
pub fn routes(service: Arc<SeedService>) -> Router {
    Router::new()
        .route("/api/seed", get(handlers::execute_seed))
        .with_state(service)
}
