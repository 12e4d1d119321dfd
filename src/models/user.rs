//! User payloads exchanged with clients and the user directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Registration payload and directory record.
///
/// `email` is overwritten server-side with the address bound to the email
/// token before the record is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BasicUserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Plain password on the way in; never serialized back out.
    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Login credentials. Missing fields deserialize as blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn has_blank_field(&self) -> bool {
        self.email.trim().is_empty() || self.password.trim().is_empty()
    }
}

/// Lookup criteria for the user directory.
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub email: String,
}

impl UserQuery {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserQueryResponse {
    pub total: u64,
    pub user_infos: Vec<BasicUserInfo>,
}
