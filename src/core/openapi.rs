use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::messages_ws::handlers as ws_handlers;
use crate::features::products::{
    dtos as products_dtos, handlers as products_handlers, models as products_models,
};
use crate::features::seed::handlers as seed_handlers;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::check_status,
        auth_handlers::private_route,
        auth_handlers::privileged_route,
        // Products
        products_handlers::create_product,
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        // Files
        files_handlers::upload_product_image,
        files_handlers::get_product_image,
        // Seed
        seed_handlers::execute_seed,
        // WebSocket
        ws_handlers::ws_handler,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::UserResponseDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::PrivateRouteResponseDto,
            auth_dtos::PrivilegedRouteResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::PrivateRouteResponseDto>,
            ApiResponse<auth_dtos::PrivilegedRouteResponseDto>,
            // Products
            products_models::ProductGender,
            products_dtos::CreateProductDto,
            products_dtos::UpdateProductDto,
            products_dtos::ProductUserDto,
            products_dtos::ProductResponseDto,
            ApiResponse<products_dtos::ProductResponseDto>,
            ApiResponse<Vec<products_dtos::ProductResponseDto>>,
            // Files
            files_dtos::UploadProductImageDto,
            files_dtos::FileUploadResponseDto,
            ApiResponse<files_dtos::FileUploadResponseDto>,
            // Seed
            ApiResponse<String>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token checks"),
        (name = "products", description = "Product catalog"),
        (name = "files", description = "Product image upload and download"),
        (name = "seed", description = "Destructive reseed (admin only)"),
        (name = "messages-ws", description = "Chat WebSocket gateway"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "API documentation for Storefront",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
