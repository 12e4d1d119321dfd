//! PostgreSQL user directory.

use super::UserDirectory;
use crate::auth::PasswordService;
use crate::db::{user_create, user_find_by_email, DbPool, UserRow};
use crate::error::AppResult;
use crate::models::{BasicUserInfo, LoginRequest, UserQuery, UserQueryResponse};
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: DbPool,
}

impl PgUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Hash to store for `user`; users registered without a password get none.
fn stored_password_hash(user: &BasicUserInfo) -> AppResult<Option<String>> {
    user.password
        .as_deref()
        .map(PasswordService::hash_password)
        .transpose()
}

/// A row without a password hash never authenticates.
fn credentials_match(row: &UserRow, password: &str) -> AppResult<bool> {
    match row.password_hash.as_deref() {
        Some(hash) => PasswordService::verify_password(password, hash),
        None => {
            debug!(user_id = %row.id, "login for user without password");
            Ok(false)
        }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn query_user(&self, query: &UserQuery) -> AppResult<UserQueryResponse> {
        let user_infos: Vec<BasicUserInfo> = user_find_by_email(&self.pool, &query.email)
            .await?
            .into_iter()
            .map(BasicUserInfo::from)
            .collect();
        Ok(UserQueryResponse {
            total: user_infos.len() as u64,
            user_infos,
        })
    }

    async fn register(&self, user: &BasicUserInfo) -> AppResult<bool> {
        let password_hash = stored_password_hash(user)?;

        match user_create(&self.pool, &user.name, &user.email, password_hash.as_deref()).await? {
            Some(row) => {
                info!(user_id = %row.id, email = %row.email, "user registered");
                Ok(true)
            }
            None => {
                info!(email = %user.email, "registration refused: email already registered");
                Ok(false)
            }
        }
    }

    async fn login(&self, credentials: &LoginRequest) -> AppResult<bool> {
        let Some(user) = user_find_by_email(&self.pool, &credentials.email).await? else {
            debug!(email = %credentials.email, "login for unknown email");
            return Ok(false);
        };
        credentials_match(&user, &credentials.password)
    }
}
