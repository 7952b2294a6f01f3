//! API handlers.

pub mod mail;

pub use mail::*;

use std::sync::Arc;

use crate::mail::MailTransport;
use crate::Database;

/// Shared state of the HTTP API.
#[derive(Clone)]
pub struct AppState {
    /// Mail store.
    pub db: Arc<Database>,
    /// Transport used by resends.
    pub transport: Arc<dyn MailTransport>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, transport: Arc<dyn MailTransport>) -> Self {
        Self { db, transport }
    }
}
