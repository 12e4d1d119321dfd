//! User directory: lookup, registration and credential checks.

mod postgres;

pub use postgres::PgUserDirectory;

use crate::error::AppResult;
use crate::models::{BasicUserInfo, LoginRequest, UserQuery, UserQueryResponse};
use async_trait::async_trait;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn query_user(&self, query: &UserQuery) -> AppResult<UserQueryResponse>;

    /// Persist a new user. `false` when the directory refuses it (e.g. email taken).
    async fn register(&self, user: &BasicUserInfo) -> AppResult<bool>;

    /// `true` when the credentials match a stored user.
    async fn login(&self, credentials: &LoginRequest) -> AppResult<bool>;
}
