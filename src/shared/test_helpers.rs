#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use crate::shared::constants::{ROLE_ADMIN, ROLE_USER};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        id: uuid::Uuid::new_v4(),
        email: "test@example.com".to_string(),
        full_name: "Test User".to_string(),
        is_active: true,
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    user_with_roles(&[ROLE_ADMIN, ROLE_USER])
}

#[cfg(test)]
pub fn create_customer_user() -> AuthenticatedUser {
    user_with_roles(&[ROLE_USER])
}

/// Wrap a router so every request carries `user`, bypassing token lookup
#[cfg(test)]
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

#[cfg(test)]
pub fn test_auth_config() -> crate::core::config::AuthConfig {
    crate::core::config::AuthConfig {
        jwt_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
        jwt_expires_in: std::time::Duration::from_secs(3600),
        jwt_leeway: std::time::Duration::from_secs(0),
    }
}
