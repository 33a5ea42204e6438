use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, PrivateRouteResponseDto, PrivilegedRouteResponseDto,
    RegisterRequestDto,
};
use crate::features::auth::guards::RequirePrivileged;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error or email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(auth_response), None, None)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials or inactive account")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Re-issue a token for the current user
#[utoipa::path(
    get,
    path = "/api/auth/check-status",
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<AuthResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_status(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    let auth_response = service.check_status(user).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Authenticated diagnostics route echoing the caller and request headers
#[utoipa::path(
    get,
    path = "/api/auth/private",
    responses(
        (status = 200, description = "Private route accessed", body = ApiResponse<PrivateRouteResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn private_route(
    user: AuthenticatedUser,
    headers: HeaderMap,
) -> Json<ApiResponse<PrivateRouteResponseDto>> {
    let raw_headers = headers
        .iter()
        .flat_map(|(name, value)| {
            [
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            ]
        })
        .collect();

    let user_email = user.email.clone();
    Json(ApiResponse::success(
        Some(PrivateRouteResponseDto {
            ok: true,
            message: "Private route accessed successfully".to_string(),
            user: user.into(),
            user_email,
            raw_headers,
        }),
        None,
        None,
    ))
}

/// Diagnostics route restricted to admin and super-user roles
#[utoipa::path(
    get,
    path = "/api/auth/private2",
    responses(
        (status = 200, description = "Privileged route accessed", body = ApiResponse<PrivilegedRouteResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin or super-user role required")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn privileged_route(
    RequirePrivileged(user): RequirePrivileged,
) -> Json<ApiResponse<PrivilegedRouteResponseDto>> {
    Json(ApiResponse::success(
        Some(PrivilegedRouteResponseDto {
            ok: true,
            user: user.into(),
        }),
        None,
        None,
    ))
}
