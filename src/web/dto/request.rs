//! Path parameters of the mail API.

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

/// `/mails/folder/{folderId}`.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Path)]
pub struct FolderPath {
    /// 0 for sent mail, 1 to 9 for received folders.
    #[validate(range(min = 0, max = 9, message = "must be between 0 and 9"))]
    pub folder_id: i32,
}

/// `/mails/label/{labelId}`.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Path)]
pub struct LabelPath {
    /// Label id, 0 to 6.
    #[validate(range(min = 0, max = 6, message = "must be between 0 and 6"))]
    pub label_id: i32,
}

/// `/mails/folder/{folderId}/{pageNumber}/{rowsOfPage}`.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Path)]
pub struct FolderPagePath {
    #[validate(range(min = 0, max = 9, message = "must be between 0 and 9"))]
    pub folder_id: i32,
    /// 1-based page number.
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page_number: u32,
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub rows_of_page: u32,
}

/// `/mails/m/{mailId}/resend`.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Path)]
pub struct MailIdPath {
    pub mail_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_bounds() {
        assert!(FolderPath { folder_id: 0 }.validate().is_ok());
        assert!(FolderPath { folder_id: 9 }.validate().is_ok());
        assert!(FolderPath { folder_id: 10 }.validate().is_err());
        assert!(FolderPath { folder_id: -1 }.validate().is_err());
    }

    #[test]
    fn test_label_bounds() {
        assert!(LabelPath { label_id: 6 }.validate().is_ok());
        assert!(LabelPath { label_id: 7 }.validate().is_err());
    }

    #[test]
    fn test_page_bounds() {
        let page = |page_number, rows_of_page| FolderPagePath {
            folder_id: 1,
            page_number,
            rows_of_page,
        };
        assert!(page(1, 1).validate().is_ok());
        assert!(page(3, 100).validate().is_ok());
        assert!(page(0, 10).validate().is_err());
        assert!(page(1, 0).validate().is_err());
        assert!(page(1, 101).validate().is_err());
    }
}
