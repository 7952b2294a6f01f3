//! Database schema and migrations for staffmail.
//!
//! Migrations are applied in order; the schema_version table records which
//! ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: staff users (reference data)
    r#"
CREATE TABLE users (
    user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_name  TEXT NOT NULL,
    staff_email TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_users_staff_email ON users(staff_email);
"#,
    // v2: mails
    r#"
CREATE TABLE mails (
    id                          BLOB PRIMARY KEY,
    sending_user_id             INTEGER NOT NULL REFERENCES users(user_id),
    receiving_user_id           INTEGER NOT NULL REFERENCES users(user_id),
    subject                     TEXT NOT NULL,
    message                     TEXT NOT NULL,
    sent_time                   TEXT NOT NULL,
    sent_success_to_smtp_server BOOLEAN NOT NULL DEFAULT 0,
    is_read                     BOOLEAN NOT NULL DEFAULT 0,
    starred                     BOOLEAN NOT NULL DEFAULT 0,
    important                   BOOLEAN NOT NULL DEFAULT 0,
    has_attachments             BOOLEAN NOT NULL DEFAULT 0,
    label                       INTEGER NOT NULL DEFAULT 6 CHECK (label BETWEEN 0 AND 6),
    folder                      INTEGER NOT NULL DEFAULT 1 CHECK (folder BETWEEN 0 AND 9),
    origin_mail_id              BLOB REFERENCES mails(id),
    error_message               TEXT
);

CREATE INDEX idx_mails_sender_sent_time ON mails(sending_user_id, sent_time);
CREATE INDEX idx_mails_receiver_sent_time ON mails(receiving_user_id, sent_time);
CREATE INDEX idx_mails_origin_mail_id ON mails(origin_mail_id);
"#,
    // v3: attachment metadata (files themselves live on disk)
    r#"
CREATE TABLE mail_attachments (
    id          BLOB PRIMARY KEY,
    mail_id     BLOB NOT NULL REFERENCES mails(id) ON DELETE CASCADE,
    filename    TEXT NOT NULL,
    saved_path  TEXT NOT NULL
);

CREATE INDEX idx_mail_attachments_mail_id ON mail_attachments(mail_id);
"#,
];
