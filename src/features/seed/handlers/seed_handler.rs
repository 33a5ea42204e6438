use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::auth::guards::RequireAdmin;
use crate::features::seed::services::SeedService;
use crate::shared::types::ApiResponse;

/// Reset the database to the seed catalog
///
/// Deletes every product and user, then loads the seed data. The
/// caller's token stops working because its account is recreated.
#[utoipa::path(
    get,
    path = "/api/seed",
    responses(
        (status = 200, description = "Seed executed", body = ApiResponse<String>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin role required")
    ),
    tag = "seed",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn execute_seed(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<SeedService>>,
) -> Result<Json<ApiResponse<String>>> {
    tracing::warn!("Seed requested by user {}", user.id);

    let result = service.run_seed().await?;
    Ok(Json(ApiResponse::success(Some(result.to_string()), None, None)))
}
