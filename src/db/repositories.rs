//! Repositories: users.

use crate::error::AppResult;
use crate::models::BasicUserInfo;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for BasicUserInfo {
    fn from(row: UserRow) -> Self {
        BasicUserInfo {
            id: Some(row.id),
            name: row.name,
            email: row.email,
            password: None,
            created_at: Some(row.created_at),
        }
    }
}

/// Insert a user unless the email is taken. `None` means it was taken.
pub async fn user_create(
    pool: &DbPool,
    name: &str,
    email: &str,
    password_hash: Option<&str>,
) -> AppResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (name, email, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id, name, email, password_hash, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn user_find_by_email(pool: &DbPool, email: &str) -> AppResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
