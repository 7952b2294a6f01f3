//! User repository for staffmail.

use sqlx::SqliteExecutor;

use super::user::{NewUser, User};
use super::DbPool;
use crate::{Result, StaffmailError};

/// Repository for staff user lookups.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a user. Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (staff_name, staff_email) VALUES (?, ?)")
            .bind(&new_user.staff_name)
            .bind(&new_user.staff_email)
            .execute(self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| StaffmailError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        Self::find(self.pool, user_id).await
    }

    /// Get a user by email address.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, staff_name, staff_email FROM users WHERE staff_email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Get a user by ID on any executor (pool, connection or transaction).
    pub async fn find<'e, E>(executor: E, user_id: i64) -> Result<Option<User>>
    where
        E: SqliteExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, staff_name, staff_email FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
