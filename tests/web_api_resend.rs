//! Web API Resend Tests
//!
//! Integration tests for POST /mails/m/{mailId}/resend.

mod common;

use std::sync::{Arc, Mutex};

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use axum_test::TestServer;
use serde_json::Value;
use tokio::net::TcpListener;
use uuid::Uuid;

use common::{at, create_test_context, create_user, insert_mail, TestContext, TEST_SECRET};
use staffmail::config::TransportConfig;
use staffmail::mail::{
    DeliveryOutcome, Mail, MailLabel, MailRepository, NewMail, NewMailAttachment, QueueTransport,
};
use staffmail::web::handlers::AppState;
use staffmail::web::middleware::JwtState;
use staffmail::web::router::create_router;
use staffmail::Database;

/// Alice's mail to Bob with two attachments.
async fn seed_mail(ctx: &TestContext) -> (i64, i64, Mail) {
    seed_mail_in(&ctx.db).await
}

async fn seed_mail_in(db: &Database) -> (i64, i64, Mail) {
    let alice = create_user(db, "Alice", "alice@example.com").await.user_id;
    let bob = create_user(db, "Bob", "bob@example.com").await.user_id;

    let mail = insert_mail(
        db,
        NewMail::new(alice, bob, "Laptop loan", "Form attached", MailLabel::AssetLoan)
            .sent_at(at(0))
            .in_folder(2)
            .with_attachments(),
    )
    .await;
    for (name, path) in [("form.pdf", "uploads/form.pdf"), ("photo.jpg", "uploads/photo.jpg")] {
        MailRepository::create_attachment(db.pool(), &NewMailAttachment::new(mail.id, name, path))
            .await
            .unwrap();
    }

    (alice, bob, mail)
}

async fn row_counts(db: &Database) -> (i64, i64) {
    (
        MailRepository::count(db.pool()).await.unwrap(),
        MailRepository::count_attachments(db.pool()).await.unwrap(),
    )
}

async fn resend_copy_of(db: &Database, origin: Uuid) -> Option<Mail> {
    let id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM mails WHERE origin_mail_id = ?")
        .bind(origin)
        .fetch_optional(db.pool())
        .await
        .unwrap();
    match id {
        Some(id) => MailRepository::get_by_id(db.pool(), id).await.unwrap(),
        None => None,
    }
}

#[tokio::test]
async fn test_resend_success() {
    let ctx = create_test_context(DeliveryOutcome::Delivered).await;
    let (alice, bob, origin) = seed_mail(&ctx).await;

    let response = ctx
        .server
        .post(&format!("/mails/m/{}/resend", origin.id))
        .add_header(AUTHORIZATION, ctx.bearer(alice))
        .await;
    response.assert_status_ok();
    assert!(response.text().is_empty());

    assert_eq!(row_counts(&ctx.db).await, (2, 4));

    let copy = resend_copy_of(&ctx.db, origin.id).await.unwrap();
    assert_ne!(copy.id, origin.id);
    assert_eq!(copy.subject, "Laptop loan");
    assert_eq!(copy.message, "Form attached");
    assert_eq!(copy.label, MailLabel::AssetLoan);
    assert_eq!(copy.sending_user_id, alice);
    assert_eq!(copy.receiving_user_id, bob);
    assert!(copy.has_attachments);
    assert!(copy.sent_time > origin.sent_time);
    assert!(copy.sent_success_to_smtp_server);

    let paths: Vec<String> = MailRepository::list_attachments(ctx.db.pool(), copy.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.saved_path)
        .collect();
    assert_eq!(paths, vec!["uploads/form.pdf", "uploads/photo.jpg"]);

    let calls = ctx.transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].mail_id, copy.id);
    assert_eq!(calls[0].from.email, "alice@example.com");
    assert_eq!(calls[0].to.email, "bob@example.com");
    assert_eq!(calls[0].attachments.len(), 2);
}

#[tokio::test]
async fn test_resend_failure_rolls_back() {
    for outcome in [DeliveryOutcome::Rejected, DeliveryOutcome::NotAttempted] {
        let ctx = create_test_context(outcome).await;
        let (alice, _, origin) = seed_mail(&ctx).await;
        let before = row_counts(&ctx.db).await;

        let response = ctx
            .server
            .post(&format!("/mails/m/{}/resend", origin.id))
            .add_header(AUTHORIZATION, ctx.bearer(alice))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Failed to resend email.");

        assert_eq!(ctx.transport.calls().len(), 1);
        assert_eq!(row_counts(&ctx.db).await, before);
        assert!(resend_copy_of(&ctx.db, origin.id).await.is_none());
    }
}

#[tokio::test]
async fn test_resend_by_receiver_denied() {
    let ctx = create_test_context(DeliveryOutcome::Delivered).await;
    let (_, bob, origin) = seed_mail(&ctx).await;
    let before = row_counts(&ctx.db).await;

    let response = ctx
        .server
        .post(&format!("/mails/m/{}/resend", origin.id))
        .add_header(AUTHORIZATION, ctx.bearer(bob))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "You are not authorised to resend the email.");

    assert!(ctx.transport.calls().is_empty());
    assert_eq!(row_counts(&ctx.db).await, before);
}

#[tokio::test]
async fn test_resend_malformed_id() {
    let ctx = create_test_context(DeliveryOutcome::Delivered).await;
    let (alice, _, _) = seed_mail(&ctx).await;
    let before = row_counts(&ctx.db).await;

    let response = ctx
        .server
        .post("/mails/m/not-a-uuid/resend")
        .add_header(AUTHORIZATION, ctx.bearer(alice))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["message"].is_string());

    assert!(ctx.transport.calls().is_empty());
    assert_eq!(row_counts(&ctx.db).await, before);
}

#[tokio::test]
async fn test_resend_unknown_mail() {
    let ctx = create_test_context(DeliveryOutcome::Delivered).await;
    let (alice, _, _) = seed_mail(&ctx).await;

    let response = ctx
        .server
        .post(&format!("/mails/m/{}/resend", Uuid::new_v4()))
        .add_header(AUTHORIZATION, ctx.bearer(alice))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "mail not found");
    assert!(ctx.transport.calls().is_empty());
}

#[tokio::test]
async fn test_resend_requires_token() {
    let ctx = create_test_context(DeliveryOutcome::Delivered).await;
    let (_, _, origin) = seed_mail(&ctx).await;

    let response = ctx
        .server
        .post(&format!("/mails/m/{}/resend", origin.id))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(ctx.transport.calls().is_empty());
}

#[tokio::test]
async fn test_resend_copy_listed_in_sent_folder() {
    let ctx = create_test_context(DeliveryOutcome::Delivered).await;
    let (alice, _, origin) = seed_mail(&ctx).await;

    ctx.server
        .post(&format!("/mails/m/{}/resend", origin.id))
        .add_header(AUTHORIZATION, ctx.bearer(alice))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .get("/mails/folder/2/1/10")
        .add_header(AUTHORIZATION, ctx.bearer(alice))
        .await;
    let body: Value = response.json();
    assert_eq!(body["totalRows"], 2);
    assert_eq!(body["results"][0]["SentSuccessToSMTPServer"], true);
    assert_eq!(body["results"][1]["Id"], origin.id.to_string());
}

// ============================================================================
// Queue transport end to end
// ============================================================================

/// Start a stand-in queue service answering with `status`.
async fn spawn_queue(status: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let app = Router::new().route(
        "/enqueue",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(body);
                status
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/enqueue"), received)
}

async fn queue_backed_server(queue_url: &str) -> (TestServer, Arc<Database>) {
    let db = Arc::new(Database::open_in_memory().await.unwrap());
    let transport = QueueTransport::new(&TransportConfig {
        enabled: true,
        queue_url: queue_url.to_string(),
        username: "staffmail".to_string(),
        password: "secret".to_string(),
        connect_timeout_secs: 2,
        total_timeout_secs: 5,
    })
    .unwrap();

    let app_state = Arc::new(AppState::new(db.clone(), Arc::new(transport)));
    let router = create_router(app_state, Arc::new(JwtState::new(TEST_SECRET)), &[]);
    (TestServer::new(router).unwrap(), db)
}

fn bearer(user_id: i64) -> String {
    format!(
        "Bearer {}",
        JwtState::new(TEST_SECRET).issue(user_id).unwrap()
    )
}

#[tokio::test]
async fn test_resend_through_queue() {
    let (queue_url, received) = spawn_queue(StatusCode::ACCEPTED).await;
    let (server, db) = queue_backed_server(&queue_url).await;
    let (alice, _, origin) = seed_mail_in(&db).await;

    server
        .post(&format!("/mails/m/{}/resend", origin.id))
        .add_header(AUTHORIZATION, bearer(alice))
        .await
        .assert_status_ok();

    let bodies = received.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["subject"], "Laptop loan");
    assert_eq!(bodies[0]["to"]["email"], "bob@example.com");
    assert_eq!(bodies[0]["attachments"][1]["path"], "uploads/photo.jpg");
    assert_eq!(row_counts(&db).await, (2, 4));
}

#[tokio::test]
async fn test_resend_refused_by_queue() {
    let (queue_url, _) = spawn_queue(StatusCode::BAD_GATEWAY).await;
    let (server, db) = queue_backed_server(&queue_url).await;
    let (alice, _, origin) = seed_mail_in(&db).await;

    let response = server
        .post(&format!("/mails/m/{}/resend", origin.id))
        .add_header(AUTHORIZATION, bearer(alice))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(row_counts(&db).await, (1, 2));
}
