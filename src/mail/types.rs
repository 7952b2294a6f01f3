//! Mail types for staffmail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::StaffmailError;

/// Folder id meaning "mail I sent".
pub const SENT_FOLDER: i32 = 0;

/// Folder new mail is received into.
pub const INBOX_FOLDER: i32 = 1;

/// Highest valid folder id.
pub const MAX_FOLDER: i32 = 9;

/// Largest page a paginated listing will return.
pub const MAX_ROWS_OF_PAGE: u32 = 100;

/// Mail label, stored and serialized as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum MailLabel {
    AssetLoan = 0,
    AssetVerification = 1,
    AssetServicing = 2,
    AssetLostDamaged = 3,
    AssetDonated = 4,
    AssetTransfer = 5,
    Others = 6,
}

impl MailLabel {
    /// All labels in id order.
    pub const ALL: [MailLabel; 7] = [
        MailLabel::AssetLoan,
        MailLabel::AssetVerification,
        MailLabel::AssetServicing,
        MailLabel::AssetLostDamaged,
        MailLabel::AssetDonated,
        MailLabel::AssetTransfer,
        MailLabel::Others,
    ];

    /// Integer id of the label.
    pub fn id(self) -> i32 {
        self as i32
    }
}

impl From<MailLabel> for i32 {
    fn from(label: MailLabel) -> Self {
        label.id()
    }
}

impl TryFrom<i32> for MailLabel {
    type Error = StaffmailError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        MailLabel::ALL
            .into_iter()
            .find(|label| label.id() == value)
            .ok_or_else(|| StaffmailError::Validation(format!("unknown label id {value}")))
    }
}

/// A stored mail.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Mail {
    /// Mail ID.
    pub id: Uuid,
    /// Sender user ID.
    pub sending_user_id: i64,
    /// Receiver user ID.
    pub receiving_user_id: i64,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// When the mail was sent.
    pub sent_time: DateTime<Utc>,
    /// Whether the transport accepted the mail.
    pub sent_success_to_smtp_server: bool,
    /// Read by the receiver.
    pub is_read: bool,
    /// Starred.
    pub starred: bool,
    /// Marked important.
    pub important: bool,
    /// Whether attachment rows exist for this mail.
    pub has_attachments: bool,
    /// Label.
    pub label: MailLabel,
    /// Folder.
    pub folder: i32,
    /// Mail this one was resent from.
    pub origin_mail_id: Option<Uuid>,
    /// Last delivery error, if any.
    pub error_message: Option<String>,
}

/// New mail for creation.
#[derive(Debug, Clone)]
pub struct NewMail {
    pub sending_user_id: i64,
    pub receiving_user_id: i64,
    pub subject: String,
    pub message: String,
    pub sent_time: DateTime<Utc>,
    pub has_attachments: bool,
    pub label: MailLabel,
    pub folder: i32,
    pub origin_mail_id: Option<Uuid>,
}

impl NewMail {
    /// Create a new mail from one user to another, into the inbox folder.
    pub fn new(
        sending_user_id: i64,
        receiving_user_id: i64,
        subject: impl Into<String>,
        message: impl Into<String>,
        label: MailLabel,
    ) -> Self {
        Self {
            sending_user_id,
            receiving_user_id,
            subject: subject.into(),
            message: message.into(),
            sent_time: Utc::now(),
            has_attachments: false,
            label,
            folder: INBOX_FOLDER,
            origin_mail_id: None,
        }
    }

    /// Build the copy of `origin` created by a resend, stamped `sent_time`.
    ///
    /// Subject, message, label, parties and the attachment flag are carried
    /// over; status flags start cleared. The stored folder is kept as well,
    /// so the paged sent listing of that folder shows the copy beside its
    /// original rather than in the inbox folder.
    pub fn resend_of(origin: &Mail, sent_time: DateTime<Utc>) -> Self {
        Self {
            sending_user_id: origin.sending_user_id,
            receiving_user_id: origin.receiving_user_id,
            subject: origin.subject.clone(),
            message: origin.message.clone(),
            sent_time,
            has_attachments: origin.has_attachments,
            label: origin.label,
            folder: origin.folder,
            origin_mail_id: Some(origin.id),
        }
    }

    /// Set the sent time.
    pub fn sent_at(mut self, sent_time: DateTime<Utc>) -> Self {
        self.sent_time = sent_time;
        self
    }

    /// Set the folder.
    pub fn in_folder(mut self, folder: i32) -> Self {
        self.folder = folder;
        self
    }

    /// Mark the mail as carrying attachments.
    pub fn with_attachments(mut self) -> Self {
        self.has_attachments = true;
        self
    }
}

/// Attachment metadata. The file itself lives at `saved_path`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MailAttachment {
    /// Attachment ID.
    pub id: Uuid,
    /// Owning mail.
    pub mail_id: Uuid,
    /// Original file name.
    pub filename: String,
    /// Storage path.
    pub saved_path: String,
}

/// New attachment metadata for creation.
#[derive(Debug, Clone)]
pub struct NewMailAttachment {
    pub mail_id: Uuid,
    pub filename: String,
    pub saved_path: String,
}

impl NewMailAttachment {
    /// Create attachment metadata for `mail_id`.
    pub fn new(mail_id: Uuid, filename: impl Into<String>, saved_path: impl Into<String>) -> Self {
        Self {
            mail_id,
            filename: filename.into(),
            saved_path: saved_path.into(),
        }
    }

    /// Metadata pointing `mail_id` at the same stored file as `original`.
    pub fn copy_of(original: &MailAttachment, mail_id: Uuid) -> Self {
        Self::new(mail_id, &original.filename, &original.saved_path)
    }
}

/// One row of a mail listing, joined with sender and receiver names.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MailSummary {
    pub id: Uuid,
    pub sending_staff_name: Option<String>,
    pub sending_staff_email: Option<String>,
    pub receiving_staff_name: Option<String>,
    pub receiving_staff_email: Option<String>,
    pub subject: String,
    pub message: String,
    pub sent_time: DateTime<Utc>,
    #[serde(rename = "SentSuccessToSMTPServer")]
    pub sent_success_to_smtp_server: bool,
    #[serde(rename = "Read")]
    pub is_read: bool,
    pub starred: bool,
    pub important: bool,
    pub has_attachments: bool,
    #[schema(value_type = i32)]
    pub label: MailLabel,
    pub folder: i32,
}

/// One page of a folder listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MailsPage {
    /// Rows of this page, newest first.
    pub results: Vec<MailSummary>,
    /// 1-based page number.
    pub page_number: u32,
    /// Requested page size.
    pub rows_of_page: u32,
    /// Number of matching rows across all pages.
    pub total_rows: i64,
}

/// Row offset of a 1-based page.
pub fn page_offset(page_number: u32, rows_of_page: u32) -> i64 {
    i64::from(page_number.saturating_sub(1)).saturating_mul(i64::from(rows_of_page))
}
