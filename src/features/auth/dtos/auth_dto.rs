use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::{AuthenticatedUser, User};
use crate::shared::validation::validate_password_strength;

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestDto {
    #[validate(email(message = "email must be an email"))]
    #[schema(example = "user@example.com")]
    pub email: String,

    #[validate(
        length(min = 6, max = 50, message = "Password must be 6-50 characters"),
        custom(function = "validate_password_strength")
    )]
    #[schema(example = "StrongP@ssw0rd")]
    pub password: String,

    #[validate(length(min = 1, message = "fullName must not be empty"))]
    #[schema(example = "John Doe")]
    pub full_name: String,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "email must be an email"))]
    #[schema(example = "user@example.com")]
    pub email: String,

    #[validate(
        length(min = 6, max = 50, message = "Password must be 6-50 characters"),
        custom(function = "validate_password_strength")
    )]
    #[schema(example = "StrongP@ssw0rd")]
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            roles: user.roles,
            created_at: Some(user.created_at),
        }
    }
}

impl From<AuthenticatedUser> for UserResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            roles: user.roles,
            created_at: None,
        }
    }
}

/// Response DTO for register, login and check-status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    /// Authenticated user info
    pub user: UserResponseDto,
    /// JWT access token
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
}

/// Response for the authenticated diagnostics route
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivateRouteResponseDto {
    pub ok: bool,
    pub message: String,
    pub user: UserResponseDto,
    pub user_email: String,
    /// Request headers as a flat `[name, value, name, value, ...]` list
    pub raw_headers: Vec<String>,
}

/// Response for the role-restricted diagnostics route
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrivilegedRouteResponseDto {
    pub ok: bool,
    pub user: UserResponseDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn register(password: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            email: SafeEmail().fake(),
            password: password.to_string(),
            full_name: Name().fake(),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(register("Abc123").validate().is_ok());
    }

    #[test]
    fn test_register_rejects_weak_or_short_password() {
        assert!(register("abc123").validate().is_err());
        assert!(register("Ab1").validate().is_err());
        assert!(register(&format!("Ab1{}", "x".repeat(60))).validate().is_err());
    }

    #[test]
    fn test_register_rejects_bad_email_and_empty_name() {
        let mut dto = register("Abc123");
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());

        let mut dto = register("Abc123");
        dto.full_name = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_reads_camel_case_body() {
        let dto: RegisterRequestDto = serde_json::from_value(serde_json::json!({
            "email": "user@example.com",
            "password": "Abc123",
            "fullName": "John Doe"
        }))
        .unwrap();
        assert_eq!(dto.full_name, "John Doe");
    }
}
