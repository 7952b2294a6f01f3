//! Mail module for staffmail.
//!
//! This module provides staff mail functionality including:
//! - Folder, label and paged listings
//! - Attachment metadata
//! - Transactional resend through a mail transport

mod repository;
mod service;
mod transport;
mod types;

pub use repository::MailRepository;
pub use service::{MailService, NOT_AUTHORISED_MESSAGE, RESEND_FAILED_MESSAGE};
pub use transport::{
    DeliveryOutcome, MailTransport, Mailbox, OutgoingAttachment, OutgoingMail, QueueTransport,
};
pub use types::{
    page_offset, Mail, MailAttachment, MailLabel, MailSummary, MailsPage, NewMail,
    NewMailAttachment, INBOX_FOLDER, MAX_FOLDER, MAX_ROWS_OF_PAGE, SENT_FOLDER,
};
