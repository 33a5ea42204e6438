use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, RegisterRequestDto, UserResponseDto,
};
use crate::features::auth::model::{AuthenticatedUser, User};
use crate::features::auth::services::{password, TokenService};

/// Emails are stored trimmed and lowercased so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Service for account operations (register, login, token refresh)
pub struct AuthService {
    pool: PgPool,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, token_service: Arc<TokenService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }

    /// Register a new user with the default role
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);
        let password_hash = password::hash_password(&dto.password).await?;

        let user = self
            .insert_user(&email, &password_hash, &dto.full_name, None)
            .await?;

        info!("User registered: id={}", user.id);

        self.auth_response(user.into())
    }

    /// Insert a user row; `roles` falls back to the column default
    pub async fn insert_user(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        roles: Option<&[String]>,
    ) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, full_name, roles)
            VALUES ($1, $2, $3, COALESCE($4, ARRAY['user']::TEXT[]))
            RETURNING id, email, password, full_name, is_active, roles, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(roles.map(|r| r.to_vec()))
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_db_write)
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, full_name, is_active, roles, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user by email: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::Unauthorized("Credentials are not valid (email)".to_string()))?;

        if !password::verify_password(&dto.password, &user.password).await? {
            return Err(AppError::Unauthorized(
                "Credentials are not valid (password)".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::Unauthorized(
                "User is inactive, talk with an admin".to_string(),
            ));
        }

        self.auth_response(user.into())
    }

    /// Re-issue a token for an already authenticated user
    pub async fn check_status(&self, user: AuthenticatedUser) -> Result<AuthResponseDto> {
        self.auth_response(user.into())
    }

    /// Remove every account (used by the seed)
    pub async fn delete_all_users(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(AppError::from_db_write)?;

        Ok(result.rows_affected())
    }

    fn auth_response(&self, user: UserResponseDto) -> Result<AuthResponseDto> {
        let token = self.token_service.issue(user.id)?;

        Ok(AuthResponseDto {
            user,
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::auth_middleware;
    use crate::features::auth::{routes, JwtValidator};
    use crate::shared::test_helpers::test_auth_config;
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::Value;

    fn services(pool: &PgPool) -> (AuthService, Arc<JwtValidator>) {
        let token_service = Arc::new(TokenService::new(&test_auth_config()));
        let validator = Arc::new(JwtValidator::new(Arc::clone(&token_service), pool.clone()));
        (AuthService::new(pool.clone(), token_service), validator)
    }

    fn register_dto(email: &str, full_name: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            email: email.to_string(),
            password: "Abc123".to_string(),
            full_name: full_name.to_string(),
        }
    }

    fn login_dto(email: &str, password: &str) -> LoginRequestDto {
        LoginRequestDto {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  John.Doe@Example.COM "), "john.doe@example.com");
        assert_eq!(normalize_email("a@b.co"), "a@b.co");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_login_and_resolve_token(pool: PgPool) {
        let (service, validator) = services(&pool);

        let registered = service
            .register(register_dto("Ann@Example.com", "Ann Lee"))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "ann@example.com");
        assert_eq!(registered.user.roles, vec!["user"]);
        assert!(registered.user.is_active);

        let logged_in = service
            .login(login_dto("ANN@example.com", "Abc123"))
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        let user = validator.validate_token(&logged_in.token).await.unwrap();
        assert_eq!(user.id, registered.user.id);
        assert_eq!(user.full_name, "Ann Lee");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_full_name_is_stored_as_validated(pool: PgPool) {
        let (service, _) = services(&pool);

        let registered = service
            .register(register_dto("padded@example.com", "  Ann Lee "))
            .await
            .unwrap();
        assert_eq!(registered.user.full_name, "  Ann Lee ");

        let stored: String = sqlx::query_scalar("SELECT full_name FROM users WHERE id = $1")
            .bind(registered.user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, "  Ann Lee ");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_errors(pool: PgPool) {
        let (service, _) = services(&pool);
        service
            .register(register_dto("ann@example.com", "Ann Lee"))
            .await
            .unwrap();

        match service.login(login_dto("nobody@example.com", "Abc123")).await {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Credentials are not valid (email)"),
            other => panic!("unexpected result: {:?}", other.map(|r| r.user.id)),
        }

        match service.login(login_dto("ann@example.com", "Wrong123")).await {
            Err(AppError::Unauthorized(msg)) => {
                assert_eq!(msg, "Credentials are not valid (password)")
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.user.id)),
        }

        sqlx::query("UPDATE users SET is_active = FALSE WHERE email = $1")
            .bind("ann@example.com")
            .execute(&pool)
            .await
            .unwrap();

        match service.login(login_dto("ann@example.com", "Abc123")).await {
            Err(AppError::Unauthorized(msg)) => {
                assert_eq!(msg, "User is inactive, talk with an admin")
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.user.id)),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_email_is_bad_request(pool: PgPool) {
        let (service, _) = services(&pool);
        service
            .register(register_dto("ann@example.com", "Ann Lee"))
            .await
            .unwrap();

        match service
            .register(register_dto("ANN@example.com", "Other Ann"))
            .await
        {
            Err(AppError::BadRequest(detail)) => {
                assert!(detail.contains("(email)=(ann@example.com)"), "{}", detail)
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.user.id)),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_token_from_login_opens_guarded_routes(pool: PgPool) {
        let (service, validator) = services(&pool);
        let service = Arc::new(service);
        service
            .register(register_dto("ann@example.com", "Ann Lee"))
            .await
            .unwrap();
        let token = service
            .login(login_dto("ann@example.com", "Abc123"))
            .await
            .unwrap()
            .token;

        let app = routes::protected_routes(Arc::clone(&service)).route_layer(
            axum::middleware::from_fn_with_state(validator, auth_middleware),
        );
        let server = TestServer::new(app).unwrap();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();

        let response = server
            .get("/api/auth/private")
            .add_header(header::AUTHORIZATION, bearer.clone())
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["userEmail"], "ann@example.com");

        let response = server
            .get("/api/auth/private2")
            .add_header(header::AUTHORIZATION, bearer)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        server
            .get("/api/auth/check-status")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
