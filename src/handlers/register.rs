//! `/register/*` handlers: verification codes, registration, login.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;
use validator::Validate;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::{BasicUserInfo, LoginRequest};

#[derive(Debug, Deserialize)]
pub struct FetchCodeParams {
    pub receiver: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckCodeParams {
    pub email: String,
    pub verification_code: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParams {
    pub email_token: String,
}

/// GET /register/fetchVerificationCode?receiver=
///
/// `false` when the mail queue refuses the message.
pub async fn fetch_verification_code(
    State(state): State<AppState>,
    Query(params): Query<FetchCodeParams>,
) -> Result<Json<bool>, AppError> {
    match state
        .verification()
        .fetch_verification_code(&params.receiver)
        .await
    {
        Ok(()) => Ok(Json(true)),
        Err(AppError::Mail(e)) => {
            warn!(receiver = %params.receiver, error = %e, "verification mail not queued");
            Ok(Json(false))
        }
        Err(e) => Err(e),
    }
}

/// GET /register/checkVerificationCode?email=&verificationCode=
///
/// Returns the token, or an empty string when the code is missing or wrong.
pub async fn check_verification_code(
    State(state): State<AppState>,
    Query(params): Query<CheckCodeParams>,
) -> Result<Json<String>, AppError> {
    let token = state
        .verification()
        .check_verification_code(&params.email, &params.verification_code)
        .await?;
    Ok(Json(token.unwrap_or_default()))
}

/// GET /register/queryBindingUserInfo?email=
pub async fn query_binding_user_info(
    State(state): State<AppState>,
    Query(params): Query<EmailParams>,
) -> Result<Json<Option<BasicUserInfo>>, AppError> {
    let user = state
        .verification()
        .query_binding_user_info(&params.email)
        .await?;
    Ok(Json(user))
}

/// POST /register/registerUser?emailToken=
pub async fn register_user(
    State(state): State<AppState>,
    Query(params): Query<RegisterParams>,
    Json(body): Json<BasicUserInfo>,
) -> Result<Json<bool>, AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let registered = state
        .verification()
        .register_user(body, &params.email_token)
        .await?;
    Ok(Json(registered))
}

/// POST /register/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<bool>, AppError> {
    let ok = state.verification().login(&body).await?;
    Ok(Json(ok))
}
