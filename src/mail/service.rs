//! Mail service for staffmail.
//!
//! Listing operations for the folder, label and page views, and the resend
//! workflow: copy a sent mail and its attachment metadata, try to deliver
//! the copy, and keep it only when delivery succeeded.

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::{Database, UserRepository};
use crate::{Result, StaffmailError};

use super::repository::MailRepository;
use super::transport::{MailTransport, OutgoingMail};
use super::types::{
    page_offset, Mail, MailAttachment, MailLabel, MailSummary, MailsPage, NewMail,
    NewMailAttachment, MAX_FOLDER, MAX_ROWS_OF_PAGE, SENT_FOLDER,
};

/// Message returned when someone other than the sender asks for a resend.
pub const NOT_AUTHORISED_MESSAGE: &str = "You are not authorised to resend the email.";

/// Message returned when the resent copy could not be delivered.
pub const RESEND_FAILED_MESSAGE: &str = "Failed to resend email.";

fn validate_folder(folder: i32) -> Result<()> {
    if !(0..=MAX_FOLDER).contains(&folder) {
        return Err(StaffmailError::Validation(format!(
            "folder id must be between 0 and {MAX_FOLDER}"
        )));
    }
    Ok(())
}

fn validate_page(page_number: u32, rows_of_page: u32) -> Result<()> {
    if page_number == 0 {
        return Err(StaffmailError::Validation(
            "page number must be at least 1".to_string(),
        ));
    }
    if rows_of_page == 0 || rows_of_page > MAX_ROWS_OF_PAGE {
        return Err(StaffmailError::Validation(format!(
            "rows of page must be between 1 and {MAX_ROWS_OF_PAGE}"
        )));
    }
    Ok(())
}

/// Service for mail operations.
pub struct MailService<'a> {
    db: &'a Database,
}

impl<'a> MailService<'a> {
    /// Create a new MailService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List every mail the user sent or received, newest first.
    pub async fn list_visible(&self, user_id: i64) -> Result<Vec<MailSummary>> {
        MailRepository::list_visible(self.db.pool(), user_id).await
    }

    /// List a folder, newest first.
    ///
    /// Folder 0 is the user's sent mail; any other folder lists mail the
    /// user received into it.
    pub async fn list_by_folder(&self, user_id: i64, folder: i32) -> Result<Vec<MailSummary>> {
        validate_folder(folder)?;

        if folder == SENT_FOLDER {
            MailRepository::list_sent(self.db.pool(), user_id).await
        } else {
            MailRepository::list_received(self.db.pool(), user_id, folder).await
        }
    }

    /// List mail with a label that the user sent or received, newest first.
    pub async fn list_by_label(&self, user_id: i64, label: MailLabel) -> Result<Vec<MailSummary>> {
        MailRepository::list_by_label(self.db.pool(), user_id, label).await
    }

    /// One page of the mail the user sent with the given folder value.
    ///
    /// `page_number` is 1-based. `total_rows` counts every matching row.
    pub async fn get_mails_by_folder_page(
        &self,
        user_id: i64,
        folder: i32,
        page_number: u32,
        rows_of_page: u32,
    ) -> Result<MailsPage> {
        validate_folder(folder)?;
        validate_page(page_number, rows_of_page)?;

        let offset = page_offset(page_number, rows_of_page);
        let results = MailRepository::page_sent_in_folder(
            self.db.pool(),
            user_id,
            folder,
            offset,
            i64::from(rows_of_page),
        )
        .await?;
        let total_rows = MailRepository::count_sent_in_folder(self.db.pool(), user_id, folder).await?;

        Ok(MailsPage {
            results,
            page_number,
            rows_of_page,
            total_rows,
        })
    }

    /// Persist the resend copy of `origin` and duplicate its attachment rows.
    ///
    /// Runs on the caller's connection so the caller owns the transaction
    /// and decides whether the rows survive. The new attachment rows point at
    /// the same stored files as the originals.
    pub async fn create_resend_copy(
        conn: &mut SqliteConnection,
        origin: &Mail,
        attachments: &[MailAttachment],
    ) -> Result<(Mail, Vec<MailAttachment>)> {
        let copy = MailRepository::create(&mut *conn, &NewMail::resend_of(origin, Utc::now())).await?;

        let mut copied = Vec::with_capacity(attachments.len());
        if copy.has_attachments {
            for attachment in attachments {
                let new_attachment = NewMailAttachment::copy_of(attachment, copy.id);
                copied.push(MailRepository::create_attachment(&mut *conn, &new_attachment).await?);
            }
        }

        Ok((copy, copied))
    }

    /// Resend a mail the user previously sent.
    ///
    /// All writes happen in one transaction that is committed only when the
    /// transport reports delivery. Any other outcome, and any error on the
    /// way, leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the mail does not exist
    /// - the user is not the mail's sender
    /// - the transport rejected the copy or did not attempt delivery
    /// - the store rejected a write
    pub async fn resend_mail(
        &self,
        user_id: i64,
        mail_id: Uuid,
        transport: &dyn MailTransport,
    ) -> Result<Mail> {
        // Take the write lock up front so a concurrent resend waits instead
        // of failing on its first write.
        let mut tx = self.db.begin_immediate().await?;

        let origin = match MailRepository::get_sent_by(&mut *tx, mail_id, user_id).await? {
            Some(mail) => mail,
            None => {
                let exists = MailRepository::get_by_id(&mut *tx, mail_id).await?.is_some();
                return Err(if exists {
                    StaffmailError::Permission(NOT_AUTHORISED_MESSAGE.to_string())
                } else {
                    StaffmailError::NotFound("mail".to_string())
                });
            }
        };

        let sender = UserRepository::find(&mut *tx, origin.sending_user_id)
            .await?
            .ok_or_else(|| StaffmailError::NotFound("sending user".to_string()))?;
        let receiver = UserRepository::find(&mut *tx, origin.receiving_user_id)
            .await?
            .ok_or_else(|| StaffmailError::NotFound("receiving user".to_string()))?;

        let attachments = if origin.has_attachments {
            MailRepository::list_attachments(&mut *tx, origin.id).await?
        } else {
            Vec::new()
        };

        let (mut copy, copied) = Self::create_resend_copy(&mut tx, &origin, &attachments).await?;

        let outgoing = OutgoingMail::build(&copy, &sender, &receiver, &copied);
        let outcome = transport.deliver(&outgoing).await;

        if !outcome.is_delivered() {
            tx.rollback().await?;
            tracing::warn!(
                user_id,
                origin_mail_id = %origin.id,
                ?outcome,
                "Resend not delivered, changes rolled back"
            );
            return Err(StaffmailError::Transport(RESEND_FAILED_MESSAGE.to_string()));
        }

        MailRepository::set_delivery_status(&mut *tx, copy.id, true, None).await?;
        tx.commit().await?;
        copy.sent_success_to_smtp_server = true;

        tracing::info!(
            user_id,
            origin_mail_id = %origin.id,
            mail_id = %copy.id,
            attachments = copied.len(),
            "Mail resent"
        );
        Ok(copy)
    }
}
