use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database model for users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string, never serialized
    pub password: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User resolved from a bearer token, stored in request extensions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// True when the user holds at least one of `roles`; an empty list admits everyone
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.is_empty() || roles.iter().any(|role| self.has_role(role))
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            roles: user.roles,
        }
    }
}

/// JWT payload. Only the user id is carried; everything else is read
/// from the database on each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_USER, ROLE_USER};
    use crate::shared::test_helpers::user_with_roles;

    #[test]
    fn test_has_any_role() {
        let user = user_with_roles(&[ROLE_USER]);
        assert!(user.has_any_role(&[]));
        assert!(user.has_any_role(&[ROLE_ADMIN, ROLE_USER]));
        assert!(!user.has_any_role(&[ROLE_ADMIN, ROLE_SUPER_USER]));
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(user_with_roles(&[ROLE_USER])).unwrap();
        assert!(value.get("fullName").is_some());
        assert!(value.get("isActive").is_some());
        assert!(value.get("password").is_none());
    }
}
