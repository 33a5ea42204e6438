use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadProductImageDto {
    /// The image to upload (jpg, jpeg, png or gif)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for an uploaded product image
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponseDto {
    /// Public URL serving the stored image
    #[schema(example = "http://localhost:3000/api/files/product/0f8e...c1.png")]
    pub secure_url: String,
}

/// Accepted image subtypes; the subtype doubles as the stored file extension
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Extension for an accepted image MIME type (`image/png` -> `png`)
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let subtype = content_type
        .split(';')
        .next()?
        .split('/')
        .nth(1)?
        .trim()
        .to_ascii_lowercase();

    ALLOWED_IMAGE_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| *ext == subtype)
}
