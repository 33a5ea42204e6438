//! Role-based authorization guards.
//!
//! Each guard reads the [`AuthenticatedUser`] placed in the request
//! extensions by the auth middleware and checks it against a fixed role
//! list. Holding any one of the listed roles is enough.
//!
//! Roles:
//! - admin: manages the catalog and may run the seed
//! - super-user: elevated access to private diagnostics routes
//! - user: default role of every registered account

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_USER};
use axum::{extract::FromRequestParts, http::request::Parts};

fn require_roles(parts: &Parts, roles: &[&str]) -> Result<AuthenticatedUser, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    if !user.has_any_role(roles) {
        return Err(AppError::Forbidden(format!(
            "User {} need a valid role: [{}]",
            user.full_name,
            roles.join(",")
        )));
    }

    Ok(user.clone())
}

/// Guard for catalog management and seeding.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_roles(parts, &[ROLE_ADMIN]).map(RequireAdmin)
    }
}

/// Guard allowing either "admin" or "super-user".
pub struct RequirePrivileged(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequirePrivileged
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_roles(parts, &[ROLE_ADMIN, ROLE_SUPER_USER]).map(RequirePrivileged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::ROLE_USER;
    use crate::shared::test_helpers::user_with_roles;
    use axum::http::Request;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let mut request = Request::new(());
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_admin_guard_accepts_admin() {
        let mut parts = parts_with(Some(user_with_roles(&[ROLE_ADMIN])));
        let guard = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(guard.is_ok());
    }

    #[tokio::test]
    async fn test_admin_guard_rejects_plain_user_with_message() {
        let mut parts = parts_with(Some(user_with_roles(&[ROLE_USER])));
        match RequireAdmin::from_request_parts(&mut parts, &()).await {
            Err(AppError::Forbidden(msg)) => {
                assert_eq!(msg, "User Test User need a valid role: [admin]")
            }
            _ => panic!("expected forbidden"),
        }
    }

    #[tokio::test]
    async fn test_guard_without_user_is_unauthorized() {
        let mut parts = parts_with(None);
        assert!(matches!(
            RequireAdmin::from_request_parts(&mut parts, &()).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_privileged_guard_accepts_super_user() {
        let mut parts = parts_with(Some(user_with_roles(&[ROLE_SUPER_USER])));
        assert!(RequirePrivileged::from_request_parts(&mut parts, &())
            .await
            .is_ok());

        let mut parts = parts_with(Some(user_with_roles(&[ROLE_USER])));
        assert!(RequirePrivileged::from_request_parts(&mut parts, &())
            .await
            .is_err());
    }
}
