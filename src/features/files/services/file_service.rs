use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{image_extension, FileUploadResponseDto};
use crate::modules::storage::DiskStorage;

/// Service for product image files
pub struct FileService {
    storage: Arc<DiskStorage>,
    host_api: String,
    max_upload_size: usize,
}

impl FileService {
    pub fn new(
        storage: Arc<DiskStorage>,
        host_api: impl Into<String>,
        max_upload_size: usize,
    ) -> Self {
        Self {
            storage,
            host_api: host_api.into(),
            max_upload_size,
        }
    }

    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    /// Public URL under which a stored image is served
    pub fn secure_url(&self, name: &str) -> String {
        format!("{}/files/product/{}", self.host_api, name)
    }

    /// Store an uploaded image and return its public URL
    pub async fn upload_product_image(
        &self,
        content_type: &str,
        data: &[u8],
    ) -> Result<FileUploadResponseDto> {
        let extension = image_extension(content_type)
            .ok_or_else(|| AppError::BadRequest("Make sure that the file is an image".to_string()))?;

        if data.len() > self.max_upload_size {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} bytes",
                self.max_upload_size
            )));
        }

        let name = self.storage.save(extension, data).await?;
        info!("Product image stored: {}", name);

        Ok(FileUploadResponseDto {
            secure_url: self.secure_url(&name),
        })
    }

    /// Location on disk of a stored image
    pub async fn product_image_path(&self, name: &str) -> Result<PathBuf> {
        self.storage
            .resolve(name)
            .await
            .ok_or_else(|| AppError::BadRequest(format!("No product found with image {}", name)))
    }
}
