//! OpenAPI document of the mail API.

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::mail::{MailSummary, MailsPage};
use crate::web::error::ErrorBody;

/// Where the document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::handlers::mail::list_mails,
        crate::web::handlers::mail::get_mails_by_folder,
        crate::web::handlers::mail::get_mails_by_label,
        crate::web::handlers::mail::get_mails_by_folder_page,
        crate::web::handlers::mail::resend_mail,
    ),
    components(schemas(MailSummary, MailsPage, ErrorBody)),
    modifiers(&SecurityAddon),
    tags(
        (name = "mail", description = "Staff mail listings and resend")
    )
)]
pub struct ApiDoc;

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

/// Create the router serving the OpenAPI document.
pub fn create_openapi_router() -> Router {
    Router::new().route(OPENAPI_PATH, get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
