//! Router configuration for the HTTP API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    get_mails_by_folder, get_mails_by_folder_page, get_mails_by_label, list_mails, resend_mail,
    AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let mail_routes = Router::new()
        .route("/mails", get(list_mails))
        .route("/mails/folder/:folderId", get(get_mails_by_folder))
        .route("/mails/label/:labelId", get(get_mails_by_label))
        .route(
            "/mails/folder/:folderId/:pageNumber/:rowsOfPage",
            get(get_mails_by_folder_page),
        )
        .route("/mails/m/:mailId/resend", post(resend_mail));

    Router::new()
        .merge(mail_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
