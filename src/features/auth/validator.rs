use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{AuthenticatedUser, User};
use super::services::TokenService;
use crate::core::error::{AppError, Result};

/// Resolves a bearer token into the user it belongs to.
///
/// The token only proves identity; the user row is re-read so that
/// deactivation and role changes apply immediately.
pub struct JwtValidator {
    token_service: Arc<TokenService>,
    pool: PgPool,
}

impl JwtValidator {
    pub fn new(token_service: Arc<TokenService>, pool: PgPool) -> Self {
        Self {
            token_service,
            pool,
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.token_service.verify(token)?;

        let user = self
            .find_user(claims.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Token not valid".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized(
                "User is inactive, talk with an admin".to_string(),
            ));
        }

        Ok(user.into())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, full_name, is_active, roles, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user for token: {:?}", e);
            AppError::Database(e)
        })
    }
}
