//! Axum router construction.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let menu_routes = Router::new()
        .route("/list", get(routes::menu::menu_list))
        .route("/{menu_code}", get(routes::menu::menu_detail));

    Router::new()
        .nest("/menu", menu_routes)
        .route("/health", get(routes::health::health))
        .layer(middleware::from_fn_with_state(
            ctx.clone(),
            crate::middleware::error_page,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use mq_core::config::Config;
    use mq_db::pool::init_memory_pool;
    use mq_db::seed::seed_fixtures;
    use mq_db::SessionFactory;
    use tower::ServiceExt;

    fn app() -> Router {
        let sessions = SessionFactory::new(init_memory_pool().unwrap());
        seed_fixtures(&sessions.open_session().unwrap()).unwrap();
        build_router(AppContext::new(sessions, Config::default()).unwrap())
    }

    async fn get_page(uri: &str) -> (StatusCode, String) {
        let (status, _, body) = get_with_type(uri).await;
        (status, body)
    }

    async fn get_with_type(uri: &str) -> (StatusCode, String, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = get_page("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn detail_page() {
        let (status, body) = get_page("/menu/7").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("민트미역국"));
    }

    #[tokio::test]
    async fn list_route_is_not_a_code() {
        let (status, body) = get_page("/menu/list").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("메뉴 목록"));
    }

    #[tokio::test]
    async fn unknown_code_is_bad_request() {
        let (status, content_type, body) = get_with_type("/menu/9999").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(content_type.starts_with("text/html"));
        assert!(body.contains("<h1>400 Bad Request</h1>"));
        assert!(body.contains(r#"<p class="error-code">illegal_argument</p>"#));
        assert!(body.contains("no menu with code 9999"));
    }

    #[tokio::test]
    async fn non_numeric_code_is_bad_request() {
        let (status, _) = get_page("/menu/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found_without_error_page() {
        let (status, content_type, body) = get_with_type("/menus").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!content_type.starts_with("text/html"));
        assert!(!body.contains("error-code"));
    }
}
