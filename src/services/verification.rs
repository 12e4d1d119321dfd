//! Email verification flow: issue codes, exchange them for email tokens, and
//! gate registration and login.
//!
//! Lifecycle per address: no code -> code issued -> code verified (token
//! minted) -> token consumed by a successful registration. Codes and tokens
//! otherwise expire through the cache TTL.

use crate::cache::{CacheNamespace, CacheStore};
use crate::directory::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::mail::{MailDispatcher, MailMessage};
use crate::models::{BasicUserInfo, LoginRequest, UserQuery};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const CODE_LENGTH: usize = 6;

/// Sender and subject of verification mails.
#[derive(Debug, Clone)]
pub struct CodeMailTemplate {
    pub sender: String,
    pub subject: String,
}

#[derive(Clone)]
pub struct VerificationService {
    cache: Arc<dyn CacheStore>,
    mailer: Arc<dyn MailDispatcher>,
    directory: Arc<dyn UserDirectory>,
    template: CodeMailTemplate,
}

impl VerificationService {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        mailer: Arc<dyn MailDispatcher>,
        directory: Arc<dyn UserDirectory>,
        template: CodeMailTemplate,
    ) -> Self {
        Self {
            cache,
            mailer,
            directory,
            template,
        }
    }

    /// Six independently drawn decimal digits; leading zeros allowed.
    pub fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        (0..CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Mail the receiver its code, reusing a live one if present.
    ///
    /// Returns `AppError::Mail` when the dispatcher refuses the message.
    pub async fn fetch_verification_code(&self, receiver: &str) -> AppResult<()> {
        let code = match self
            .cache
            .get(CacheNamespace::VerificationCode, receiver)
            .await?
        {
            Some(code) => {
                debug!(receiver = %receiver, code = %code, "reusing cached verification code");
                code
            }
            None => {
                let code = Self::generate_code();
                debug!(receiver = %receiver, code = %code, "generated verification code");
                self.cache
                    .put(CacheNamespace::VerificationCode, receiver, &code)
                    .await?;
                code
            }
        };

        let message = MailMessage {
            from: self.template.sender.clone(),
            to: receiver.to_string(),
            subject: self.template.subject.clone(),
            body: code,
        };
        self.mailer.enqueue(message).await?;
        info!(receiver = %receiver, "verification code queued");
        Ok(())
    }

    /// Exchange a code for an email token.
    ///
    /// `None` when no code is cached for `email` or the candidate differs
    /// (exact match). A token is minted and stored only on a match.
    pub async fn check_verification_code(
        &self,
        email: &str,
        verification_code: &str,
    ) -> AppResult<Option<String>> {
        let Some(expected) = self
            .cache
            .get(CacheNamespace::VerificationCode, email)
            .await?
        else {
            debug!(email = %email, "no verification code cached");
            return Ok(None);
        };

        if expected != verification_code {
            debug!(email = %email, "verification code mismatch");
            return Ok(None);
        }

        let token = Uuid::new_v4().to_string();
        self.cache.put(CacheNamespace::Token, &token, email).await?;
        info!(email = %email, "verification code accepted, token issued");
        Ok(Some(token))
    }

    /// First directory record bound to `email`, if any.
    pub async fn query_binding_user_info(&self, email: &str) -> AppResult<Option<BasicUserInfo>> {
        let response = self.directory.query_user(&UserQuery::by_email(email)).await?;
        if response.total == 0 {
            return Ok(None);
        }
        Ok(response.user_infos.into_iter().next())
    }

    /// Register `user` under the address bound to `email_token`.
    ///
    /// Any caller-supplied email is replaced. The token is removed after the
    /// directory accepts the user; if that removal fails the registration
    /// still stands and the token lapses with its TTL.
    pub async fn register_user(&self, mut user: BasicUserInfo, email_token: &str) -> AppResult<bool> {
        let email = self
            .cache
            .get(CacheNamespace::Token, email_token)
            .await?
            .filter(|e| !e.trim().is_empty())
            .ok_or(AppError::ReVerify)?;

        user.email = email;
        let registered = self.directory.register(&user).await?;
        if registered {
            if let Err(e) = self.cache.remove(CacheNamespace::Token, email_token).await {
                warn!(email = %user.email, error = %e, "registered but email token not removed");
            }
        }
        info!(email = %user.email, registered, "registration attempt");
        Ok(registered)
    }

    /// Blank email or password fails without consulting the directory.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<bool> {
        if request.has_blank_field() {
            return Ok(false);
        }
        self.directory.login(request).await
    }
}
