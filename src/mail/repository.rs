//! Mail repository for staffmail.
//!
//! Every statement binds its inputs; nothing user-supplied is spliced into
//! SQL text. Functions take any SQLite executor so the same queries run on
//! the pool or inside a transaction.

use sqlx::SqliteExecutor;
use uuid::Uuid;

use super::types::{Mail, MailAttachment, MailLabel, MailSummary, NewMail, NewMailAttachment};
use crate::Result;

const MAIL_COLUMNS: &str = "id, sending_user_id, receiving_user_id, subject, message, sent_time,
       sent_success_to_smtp_server, is_read, starred, important, has_attachments,
       label, folder, origin_mail_id, error_message";

/// Repository for mail operations.
pub struct MailRepository;

impl MailRepository {
    /// Insert a new mail with a fresh id.
    pub async fn create<'e, E>(executor: E, mail: &NewMail) -> Result<Mail>
    where
        E: SqliteExecutor<'e>,
    {
        let sql = format!(
            "INSERT INTO mails (id, sending_user_id, receiving_user_id, subject, message,
                                sent_time, has_attachments, label, folder, origin_mail_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {MAIL_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Mail>(&sql)
            .bind(Uuid::new_v4())
            .bind(mail.sending_user_id)
            .bind(mail.receiving_user_id)
            .bind(&mail.subject)
            .bind(&mail.message)
            .bind(mail.sent_time)
            .bind(mail.has_attachments)
            .bind(mail.label)
            .bind(mail.folder)
            .bind(mail.origin_mail_id)
            .fetch_one(executor)
            .await?;
        Ok(created)
    }

    /// Get a mail by ID.
    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Mail>>
    where
        E: SqliteExecutor<'e>,
    {
        let sql = format!("SELECT {MAIL_COLUMNS} FROM mails WHERE id = ?");
        let mail = sqlx::query_as::<_, Mail>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(mail)
    }

    /// Get a mail by ID only if `sender_id` sent it.
    pub async fn get_sent_by<'e, E>(executor: E, id: Uuid, sender_id: i64) -> Result<Option<Mail>>
    where
        E: SqliteExecutor<'e>,
    {
        let sql = format!("SELECT {MAIL_COLUMNS} FROM mails WHERE id = ? AND sending_user_id = ?");
        let mail = sqlx::query_as::<_, Mail>(&sql)
            .bind(id)
            .bind(sender_id)
            .fetch_optional(executor)
            .await?;
        Ok(mail)
    }

    /// Record a delivery outcome on a mail.
    pub async fn set_delivery_status<'e, E>(
        executor: E,
        id: Uuid,
        delivered: bool,
        error_message: Option<&str>,
    ) -> Result<bool>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE mails SET sent_success_to_smtp_server = ?, error_message = ? WHERE id = ?",
        )
        .bind(delivered)
        .bind(error_message)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert attachment metadata.
    pub async fn create_attachment<'e, E>(
        executor: E,
        attachment: &NewMailAttachment,
    ) -> Result<MailAttachment>
    where
        E: SqliteExecutor<'e>,
    {
        let created = sqlx::query_as::<_, MailAttachment>(
            "INSERT INTO mail_attachments (id, mail_id, filename, saved_path)
             VALUES (?, ?, ?, ?)
             RETURNING id, mail_id, filename, saved_path",
        )
        .bind(Uuid::new_v4())
        .bind(attachment.mail_id)
        .bind(&attachment.filename)
        .bind(&attachment.saved_path)
        .fetch_one(executor)
        .await?;
        Ok(created)
    }

    /// List attachment metadata for a mail.
    pub async fn list_attachments<'e, E>(executor: E, mail_id: Uuid) -> Result<Vec<MailAttachment>>
    where
        E: SqliteExecutor<'e>,
    {
        let attachments = sqlx::query_as::<_, MailAttachment>(
            "SELECT id, mail_id, filename, saved_path
             FROM mail_attachments
             WHERE mail_id = ?
             ORDER BY rowid",
        )
        .bind(mail_id)
        .fetch_all(executor)
        .await?;
        Ok(attachments)
    }

    /// List mail sent by a user. The folder is reported as the sent folder.
    pub async fn list_sent<'e, E>(executor: E, user_id: i64) -> Result<Vec<MailSummary>>
    where
        E: SqliteExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, MailSummary>(
            "SELECT m.id,
                    su.staff_name AS sending_staff_name, su.staff_email AS sending_staff_email,
                    ru.staff_name AS receiving_staff_name, ru.staff_email AS receiving_staff_email,
                    m.subject, m.message, m.sent_time, m.sent_success_to_smtp_server,
                    m.is_read, m.starred, m.important, m.has_attachments, m.label,
                    0 AS folder
             FROM mails m
             LEFT JOIN users su ON su.user_id = m.sending_user_id
             LEFT JOIN users ru ON ru.user_id = m.receiving_user_id
             WHERE m.sending_user_id = ?
             ORDER BY m.sent_time DESC, m.rowid DESC",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// List mail a user received into a folder.
    pub async fn list_received<'e, E>(
        executor: E,
        user_id: i64,
        folder: i32,
    ) -> Result<Vec<MailSummary>>
    where
        E: SqliteExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, MailSummary>(
            "SELECT m.id,
                    su.staff_name AS sending_staff_name, su.staff_email AS sending_staff_email,
                    ru.staff_name AS receiving_staff_name, ru.staff_email AS receiving_staff_email,
                    m.subject, m.message, m.sent_time, m.sent_success_to_smtp_server,
                    m.is_read, m.starred, m.important, m.has_attachments, m.label, m.folder
             FROM mails m
             LEFT JOIN users su ON su.user_id = m.sending_user_id
             LEFT JOIN users ru ON ru.user_id = m.receiving_user_id
             WHERE m.receiving_user_id = ? AND m.folder = ?
             ORDER BY m.sent_time DESC, m.rowid DESC",
        )
        .bind(user_id)
        .bind(folder)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// List mail with a label that the user sent or received.
    pub async fn list_by_label<'e, E>(
        executor: E,
        user_id: i64,
        label: MailLabel,
    ) -> Result<Vec<MailSummary>>
    where
        E: SqliteExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, MailSummary>(
            "SELECT m.id,
                    su.staff_name AS sending_staff_name, su.staff_email AS sending_staff_email,
                    ru.staff_name AS receiving_staff_name, ru.staff_email AS receiving_staff_email,
                    m.subject, m.message, m.sent_time, m.sent_success_to_smtp_server,
                    m.is_read, m.starred, m.important, m.has_attachments, m.label, m.folder
             FROM mails m
             LEFT JOIN users su ON su.user_id = m.sending_user_id
             LEFT JOIN users ru ON ru.user_id = m.receiving_user_id
             WHERE (m.sending_user_id = ?1 OR m.receiving_user_id = ?1) AND m.label = ?2
             ORDER BY m.sent_time DESC, m.rowid DESC",
        )
        .bind(user_id)
        .bind(label)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// List every mail the user sent or received.
    pub async fn list_visible<'e, E>(executor: E, user_id: i64) -> Result<Vec<MailSummary>>
    where
        E: SqliteExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, MailSummary>(
            "SELECT m.id,
                    su.staff_name AS sending_staff_name, su.staff_email AS sending_staff_email,
                    ru.staff_name AS receiving_staff_name, ru.staff_email AS receiving_staff_email,
                    m.subject, m.message, m.sent_time, m.sent_success_to_smtp_server,
                    m.is_read, m.starred, m.important, m.has_attachments, m.label, m.folder
             FROM mails m
             LEFT JOIN users su ON su.user_id = m.sending_user_id
             LEFT JOIN users ru ON ru.user_id = m.receiving_user_id
             WHERE m.sending_user_id = ?1 OR m.receiving_user_id = ?1
             ORDER BY m.sent_time DESC, m.rowid DESC",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// One page of mail a user sent with the given folder value.
    pub async fn page_sent_in_folder<'e, E>(
        executor: E,
        user_id: i64,
        folder: i32,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MailSummary>>
    where
        E: SqliteExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, MailSummary>(
            "SELECT m.id,
                    su.staff_name AS sending_staff_name, su.staff_email AS sending_staff_email,
                    ru.staff_name AS receiving_staff_name, ru.staff_email AS receiving_staff_email,
                    m.subject, m.message, m.sent_time, m.sent_success_to_smtp_server,
                    m.is_read, m.starred, m.important, m.has_attachments, m.label, m.folder
             FROM mails m
             LEFT JOIN users su ON su.user_id = m.sending_user_id
             LEFT JOIN users ru ON ru.user_id = m.receiving_user_id
             WHERE m.folder = ? AND m.sending_user_id = ?
             ORDER BY m.sent_time DESC, m.rowid DESC
             LIMIT ? OFFSET ?",
        )
        .bind(folder)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Count mail a user sent with the given folder value.
    pub async fn count_sent_in_folder<'e, E>(executor: E, user_id: i64, folder: i32) -> Result<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM mails WHERE folder = ? AND sending_user_id = ?",
        )
        .bind(folder)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    /// Count total mails in the database.
    pub async fn count<'e, E>(executor: E) -> Result<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mails")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    /// Count total attachment rows in the database.
    pub async fn count_attachments<'e, E>(executor: E) -> Result<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mail_attachments")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
