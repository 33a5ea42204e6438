use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::{AuthenticatedUser, User};
use crate::features::products::models::{ProductGender, ProductRecord};

/// Request DTO for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, message = "title must be longer than or equal to 1 characters"))]
    #[schema(example = "Men's Chill Crew Neck Sweatshirt")]
    pub title: String,

    #[validate(range(min = 0.0, message = "price must be a positive number"))]
    #[schema(example = 75.0)]
    pub price: Option<f64>,

    pub description: Option<String>,

    /// Defaults to the title; always normalized before saving
    pub slug: Option<String>,

    #[validate(range(min = 0, message = "stock must be a positive number"))]
    pub stock: Option<i32>,

    #[schema(example = json!(["XS", "S", "M"]))]
    pub sizes: Option<Vec<String>>,

    pub gender: ProductGender,

    pub tags: Option<Vec<String>>,

    /// Image file names or URLs
    pub images: Option<Vec<String>>,
}

/// Request DTO for updating a product; omitted fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(length(min = 1, message = "title must be longer than or equal to 1 characters"))]
    pub title: Option<String>,

    #[validate(range(min = 0.0, message = "price must be a positive number"))]
    pub price: Option<f64>,

    pub description: Option<String>,

    pub slug: Option<String>,

    #[validate(range(min = 0, message = "stock must be a positive number"))]
    pub stock: Option<i32>,

    pub sizes: Option<Vec<String>>,

    pub gender: Option<ProductGender>,

    pub tags: Option<Vec<String>>,

    /// When present, replaces every image of the product
    pub images: Option<Vec<String>>,
}

/// Account that created or last edited a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUserDto {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

impl From<&AuthenticatedUser> for ProductUserDto {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

impl From<&User> for ProductUserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

/// Response DTO for product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: ProductGender,
    pub tags: Vec<String>,
    /// Image URLs in insertion order
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ProductUserDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponseDto {
    pub fn from_record(record: ProductRecord, images: Vec<String>) -> Self {
        let user = match (record.product.user_id, record.user_email, record.user_full_name) {
            (Some(id), Some(email), Some(full_name)) => Some(ProductUserDto {
                id,
                email,
                full_name,
            }),
            _ => None,
        };

        let p = record.product;
        Self {
            id: p.id,
            title: p.title,
            price: p.price,
            description: p.description,
            slug: p.slug,
            stock: p.stock,
            sizes: p.sizes,
            gender: p.gender,
            tags: p.tags,
            images,
            user,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
