//! Router configuration for the upload API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_file, delete_user_file, upload_file, upload_protocol_file, upload_user_file, AppState,
};
use super::middleware::create_cors_layer;

/// URL prefix under which stored files are served.
pub const STATIC_PREFIX: &str = "/uploads";

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // "/upload" and "/upload/" are both accepted for the root scope.
    let upload_routes = Router::new()
        .route("/upload", post(upload_file))
        .route("/upload/", post(upload_file))
        .route("/upload/delete/:filename", delete(delete_file))
        .route("/upload/users", post(upload_user_file))
        .route("/upload/users/:filename", delete(delete_user_file))
        .route("/upload/protocol/:protocolo", post(upload_protocol_file))
        .layer(DefaultBodyLimit::disable());

    let static_files = ServeDir::new(app_state.storage.base_path());

    Router::new()
        .merge(upload_routes)
        .nest_service(STATIC_PREFIX, static_files)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileStorage;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router() -> (TempDir, Router) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        let state = Arc::new(AppState::new(storage, "http://localhost:3030"));
        (temp_dir, create_router(state, &[]))
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_dir, router) = test_router();

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_static_file_served() {
        let (dir, router) = test_router();
        std::fs::create_dir_all(dir.path().join("users")).unwrap();
        std::fs::write(dir.path().join("users").join("abc.txt"), b"hello").unwrap();

        let response = router
            .oneshot(
                Request::get("/uploads/users/abc.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (_dir, router) = test_router();

        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
