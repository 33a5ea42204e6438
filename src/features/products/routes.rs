use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Public catalog reads
pub fn public_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/{term}", get(handlers::get_product))
        .with_state(service)
}

/// Catalog writes (JWT required, admin role checked per handler)
pub fn protected_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", post(handlers::create_product))
        .route(
            "/api/products/{term}",
            axum::routing::patch(handlers::update_product).delete(handlers::delete_product),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::create_lazy_pool;
    use crate::shared::test_helpers::{create_customer_user, with_admin_auth, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn service() -> Arc<ProductService> {
        Arc::new(ProductService::new(create_lazy_pool()))
    }

    fn admin_server() -> TestServer {
        TestServer::new(with_admin_auth(protected_routes(service()))).unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body() {
        let response = admin_server()
            .post("/api/products")
            .json(&json!({ "title": "", "gender": "men" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_gender() {
        admin_server()
            .post("/api/products")
            .json(&json!({ "title": "Tee", "gender": "robots" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_forbidden_for_plain_user() {
        let server = TestServer::new(with_user(
            protected_routes(service()),
            create_customer_user(),
        ))
        .unwrap();

        let response = server
            .post("/api/products")
            .json(&json!({ "title": "Tee", "gender": "men" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["message"], "User Test User need a valid role: [admin]");
    }

    #[tokio::test]
    async fn test_write_routes_without_user_are_unauthorized() {
        let server = TestServer::new(protected_routes(service())).unwrap();
        server
            .delete(&format!("/api/products/{}", uuid::Uuid::new_v4()))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_and_delete_require_uuid() {
        let server = admin_server();

        server
            .patch("/api/products/not-a-uuid")
            .json(&json!({ "price": 10.0 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .delete("/api/products/not-a-uuid")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_pagination() {
        let server = TestServer::new(public_routes(service())).unwrap();

        server
            .get("/api/products")
            .add_query_param("limit", 0)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get("/api/products")
            .add_query_param("offset", -1)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get("/api/products")
            .add_query_param("limit", "abc")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
