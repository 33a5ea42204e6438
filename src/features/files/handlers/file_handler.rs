use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tower_http::services::ServeFile;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::files::dtos::{FileUploadResponseDto, UploadProductImageDto};
use crate::features::files::services::FileService;
use crate::shared::types::ApiResponse;

/// Upload a product image
///
/// Accepts multipart/form-data with a single `file` field holding a
/// jpg, jpeg, png or gif image.
#[utoipa::path(
    post,
    path = "/api/files/product",
    tag = "files",
    request_body(
        content = UploadProductImageDto,
        content_type = "multipart/form-data",
        description = "Image upload form",
    ),
    responses(
        (status = 201, description = "Image stored", body = ApiResponse<FileUploadResponseDto>),
        (status = 400, description = "Missing file, not an image, or too large")
    )
)]
pub async fn upload_product_image(
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileUploadResponseDto>>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        let response = service.upload_product_image(&content_type, &data).await?;

        return Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(response), None, None)),
        ));
    }

    Err(AppError::BadRequest(
        "Make sure that the file is an image".to_string(),
    ))
}

/// Serve a stored product image
#[utoipa::path(
    get,
    path = "/api/files/product/{imageName}",
    tag = "files",
    params(
        ("imageName" = String, Path, description = "Stored image name")
    ),
    responses(
        (status = 200, description = "Image content"),
        (status = 400, description = "No image stored under this name")
    )
)]
pub async fn get_product_image(
    State(service): State<Arc<FileService>>,
    Path(image_name): Path<String>,
) -> Result<Response, AppError> {
    let path = service.product_image_path(&image_name).await?;

    let req = Request::builder()
        .body(Body::empty())
        .map_err(|e| AppError::Internal(format!("Failed to build request: {}", e)))?;

    ServeFile::new(path)
        .try_call(req)
        .await
        .map(IntoResponse::into_response)
        .map_err(|e| AppError::Internal(format!("Failed to read image: {}", e)))
}
