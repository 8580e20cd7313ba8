use chrono::Utc;

use super::schema::Database;
use super::types::{StoreError, User};

impl Database {
    // ========================================================================
    // User Operations
    // ========================================================================

    /// Create a user. Names are unique; a duplicate surfaces as
    /// `StoreError::UniqueViolation`.
    pub async fn create_user(&self, name: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (created_at, name)
            VALUES (?, ?)
            RETURNING id, created_at, name
        "#,
        )
        .bind(Utc::now().timestamp())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    /// Look up a user by name. Unknown names yield `StoreError::NotFound`.
    pub async fn user_by_name(&self, name: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>("SELECT id, created_at, name FROM users WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    /// All users, in registration order.
    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT id, created_at, name FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }
}
