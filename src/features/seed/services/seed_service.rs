use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::auth::services::{normalize_email, password, AuthService};
use crate::features::products::dtos::ProductUserDto;
use crate::features::products::ProductService;
use crate::features::seed::data::{SEED_PRODUCTS, SEED_USERS};

/// Wipes the catalog and accounts, then loads the static seed data
pub struct SeedService {
    auth_service: Arc<AuthService>,
    product_service: Arc<ProductService>,
}

impl SeedService {
    pub fn new(auth_service: Arc<AuthService>, product_service: Arc<ProductService>) -> Self {
        Self {
            auth_service,
            product_service,
        }
    }

    pub async fn run_seed(&self) -> Result<&'static str> {
        let products = self.product_service.delete_all_products().await?;
        let users = self.auth_service.delete_all_users().await?;
        info!("Seed cleared {} products and {} users", products, users);

        let owner = self.insert_users().await?;
        self.insert_products(owner).await?;

        info!(
            "Seed inserted {} users and {} products",
            SEED_USERS.len(),
            SEED_PRODUCTS.len()
        );
        Ok("SEED EXECUTED")
    }

    /// Insert the seed users, returning the first one
    async fn insert_users(&self) -> Result<ProductUserDto> {
        let mut owner = None;

        for seed in SEED_USERS {
            let hash = password::hash_password(seed.password).await?;
            let roles: Vec<String> = seed.roles.iter().map(|r| r.to_string()).collect();

            let user = self
                .auth_service
                .insert_user(
                    &normalize_email(seed.email),
                    &hash,
                    seed.full_name,
                    Some(roles.as_slice()),
                )
                .await?;

            owner.get_or_insert_with(|| ProductUserDto::from(&user));
        }

        owner.ok_or_else(|| AppError::Internal("Seed data has no users".to_string()))
    }

    async fn insert_products(&self, owner: ProductUserDto) -> Result<()> {
        for seed in SEED_PRODUCTS {
            self.product_service
                .create(seed.into(), owner.clone())
                .await?;
        }
        Ok(())
    }
}
