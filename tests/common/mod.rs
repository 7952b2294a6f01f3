//! Test helpers for the HTTP API tests.
//!
//! Provides an in-memory server with a recording transport, seeded users
//! and bearer tokens.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};

use staffmail::mail::{DeliveryOutcome, Mail, MailRepository, MailTransport, NewMail, OutgoingMail};
use staffmail::web::handlers::AppState;
use staffmail::web::middleware::JwtState;
use staffmail::web::router::create_router;
use staffmail::{Database, NewUser, User, UserRepository};

/// Secret shared by the test server and the token helper.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Transport answering with a fixed outcome and recording every call.
pub struct RecordingTransport {
    outcome: DeliveryOutcome,
    calls: Mutex<Vec<OutgoingMail>>,
}

impl RecordingTransport {
    pub fn new(outcome: DeliveryOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mails handed to the transport so far.
    pub fn calls(&self) -> Vec<OutgoingMail> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, mail: &OutgoingMail) -> DeliveryOutcome {
        self.calls.lock().unwrap().push(mail.clone());
        self.outcome
    }
}

/// A running test server and its collaborators.
pub struct TestContext {
    pub server: TestServer,
    pub db: Arc<Database>,
    pub transport: Arc<RecordingTransport>,
    pub jwt: JwtState,
}

impl TestContext {
    /// Authorization header value for `user_id`.
    pub fn bearer(&self, user_id: i64) -> String {
        format!("Bearer {}", self.jwt.issue(user_id).unwrap())
    }
}

/// Create a test server with an in-memory database and the given transport outcome.
pub async fn create_test_context(outcome: DeliveryOutcome) -> TestContext {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );
    let transport = Arc::new(RecordingTransport::new(outcome));

    let app_state = Arc::new(AppState::new(db.clone(), transport.clone()));
    let jwt_state = Arc::new(JwtState::new(TEST_SECRET));
    let router = create_router(app_state, jwt_state, &[]);

    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext {
        server,
        db,
        transport,
        jwt: JwtState::new(TEST_SECRET),
    }
}

/// Insert a staff user.
pub async fn create_user(db: &Database, name: &str, email: &str) -> User {
    UserRepository::new(db.pool())
        .create(&NewUser::new(name, email))
        .await
        .unwrap()
}

/// Insert a mail.
pub async fn insert_mail(db: &Database, mail: NewMail) -> Mail {
    MailRepository::create(db.pool(), &mail).await.unwrap()
}

/// Fixed timestamp `minutes` after a reference instant.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}
