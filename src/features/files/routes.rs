use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{get_product_image, upload_product_image};
use crate::features::files::services::FileService;

/// Create routes for the files feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(file_service: Arc<FileService>) -> Router {
    // Allow body size up to the upload limit + buffer for multipart overhead
    let body_limit = file_service.max_upload_size() + 1024 * 1024;

    Router::new()
        .route(
            "/api/files/product",
            post(upload_product_image).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/files/product/{image_name}", get(get_product_image))
        .with_state(file_service)
}
