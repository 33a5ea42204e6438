use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Product gender enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "product_gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductGender {
    Men,
    Women,
    Kid,
    Unisex,
}

/// Database model for product
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: ProductGender,
    pub tags: Vec<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product row joined with the account that last wrote it
#[derive(Debug, Clone, FromRow)]
pub struct ProductRecord {
    #[sqlx(flatten)]
    pub product: Product,
    pub user_email: Option<String>,
    pub user_full_name: Option<String>,
}

/// Lowercase, spaces to underscores, apostrophes dropped.
///
/// `"Men's Chill Crew Neck"` becomes `"mens_chill_crew_neck"`.
pub fn normalize_slug(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "_").replace('\'', "")
}

pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().map(|t| t.to_lowercase()).collect()
}
