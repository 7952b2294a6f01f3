//! Staff user model.

use serde::Serialize;

/// A staff user.
///
/// Owned by the user-management subsystem; read here to resolve sender and
/// receiver names and addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    /// User ID.
    pub user_id: i64,
    /// Display name.
    pub staff_name: String,
    /// Email address.
    pub staff_email: String,
}

/// New user for seeding.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub staff_name: String,
    /// Email address.
    pub staff_email: String,
}

impl NewUser {
    /// Create a new user record.
    pub fn new(staff_name: impl Into<String>, staff_email: impl Into<String>) -> Self {
        Self {
            staff_name: staff_name.into(),
            staff_email: staff_email.into(),
        }
    }
}
