//! Validation utilities for the HTTP API.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A path extractor that validates the parameters.
///
/// Parameters that fail to parse or to validate are rejected with a 400
/// before the handler runs.
///
/// # Example
///
/// ```ignore
/// use staffmail::web::dto::{FolderPath, ValidatedPath};
///
/// async fn get_folder(
///     ValidatedPath(path): ValidatedPath<FolderPath>,
/// ) -> Result<Json<Vec<MailSummary>>, ApiError> {
///     // path.folder_id is already within bounds
///     // ...
/// }
/// ```
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedPath(value))
    }
}
