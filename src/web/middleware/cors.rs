//! CORS middleware configuration.

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Methods the mail API answers.
const METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Create a CORS layer from the configured origins.
///
/// No usable origin means any origin may call, without credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods(METHODS)
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_methods(METHODS)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
            .allow_credentials(true)
            .allow_origin(parsed_origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app(origins: &[String]) -> Router {
        Router::new()
            .route("/mails", get(|| async { "[]" }))
            .layer(create_cors_layer(origins))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/mails")
            .header("origin", origin)
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_any_origin_without_configuration() {
        let response = app(&[]).oneshot(preflight("http://elsewhere.test")).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_configured_origin_only() {
        let origins = vec!["http://localhost:5173".to_string()];

        let response = app(&origins).oneshot(preflight("http://localhost:5173")).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );

        let response = app(&origins).oneshot(preflight("http://elsewhere.test")).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}
