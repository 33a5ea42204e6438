use sqlx::FromRow;
use uuid::Uuid;

/// Database model for product image
#[derive(Debug, Clone, FromRow)]
pub struct ProductImage {
    pub url: String,
    pub product_id: Uuid,
}
