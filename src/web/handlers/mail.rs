//! Mail handlers for the HTTP API.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::mail::{MailLabel, MailService, MailSummary, MailsPage};
use crate::web::dto::{FolderPagePath, FolderPath, LabelPath, MailIdPath, ValidatedPath};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /mails - List every mail the caller sent or received.
#[utoipa::path(
    get,
    path = "/mails",
    tag = "mail",
    responses(
        (status = 200, description = "Mail visible to the caller, newest first", body = Vec<MailSummary>),
        (status = 400, description = "Request failed", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_mails(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<MailSummary>>, ApiError> {
    let mails = MailService::new(&state.db).list_visible(claims.sub).await?;
    Ok(Json(mails))
}

/// GET /mails/folder/{folderId} - List a folder.
///
/// Folder 0 lists mail the caller sent.
#[utoipa::path(
    get,
    path = "/mails/folder/{folderId}",
    tag = "mail",
    params(FolderPath),
    responses(
        (status = 200, description = "Mail in the folder, newest first", body = Vec<MailSummary>),
        (status = 400, description = "Invalid folder", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_mails_by_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedPath(path): ValidatedPath<FolderPath>,
) -> Result<Json<Vec<MailSummary>>, ApiError> {
    let mails = MailService::new(&state.db)
        .list_by_folder(claims.sub, path.folder_id)
        .await?;
    Ok(Json(mails))
}

/// GET /mails/label/{labelId} - List mail with a label.
#[utoipa::path(
    get,
    path = "/mails/label/{labelId}",
    tag = "mail",
    params(LabelPath),
    responses(
        (status = 200, description = "Labelled mail, newest first", body = Vec<MailSummary>),
        (status = 400, description = "Invalid label", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_mails_by_label(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedPath(path): ValidatedPath<LabelPath>,
) -> Result<Json<Vec<MailSummary>>, ApiError> {
    let label = MailLabel::try_from(path.label_id)?;
    let mails = MailService::new(&state.db)
        .list_by_label(claims.sub, label)
        .await?;
    Ok(Json(mails))
}

/// GET /mails/folder/{folderId}/{pageNumber}/{rowsOfPage} - One page of sent mail.
#[utoipa::path(
    get,
    path = "/mails/folder/{folderId}/{pageNumber}/{rowsOfPage}",
    tag = "mail",
    params(FolderPagePath),
    responses(
        (status = 200, description = "Requested page", body = MailsPage),
        (status = 400, description = "Invalid folder or page", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_mails_by_folder_page(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedPath(path): ValidatedPath<FolderPagePath>,
) -> Result<Json<MailsPage>, ApiError> {
    let page = MailService::new(&state.db)
        .get_mails_by_folder_page(claims.sub, path.folder_id, path.page_number, path.rows_of_page)
        .await?;
    Ok(Json(page))
}

/// POST /mails/m/{mailId}/resend - Resend a mail the caller sent.
#[utoipa::path(
    post,
    path = "/mails/m/{mailId}/resend",
    tag = "mail",
    params(MailIdPath),
    responses(
        (status = 200, description = "Mail resent"),
        (status = 400, description = "Not resent", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn resend_mail(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedPath(path): ValidatedPath<MailIdPath>,
) -> Result<StatusCode, ApiError> {
    MailService::new(&state.db)
        .resend_mail(claims.sub, path.mail_id, state.transport.as_ref())
        .await?;
    Ok(StatusCode::OK)
}
