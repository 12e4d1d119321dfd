//! Email-verified user registration and login service built with Rust.
//!
//! Issues 6-digit verification codes by mail, exchanges them for short-lived
//! email tokens, and uses those tokens to gate registration.

pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;
pub use services::VerificationService;

use axum::routing::{get, post};
use handlers::{http, register};
use tower_http::trace::TraceLayer;

/// Build the API router (register flow, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let register_routes = axum::Router::new()
        .route(
            "/fetchVerificationCode",
            get(register::fetch_verification_code),
        )
        .route(
            "/checkVerificationCode",
            get(register::check_verification_code),
        )
        .route(
            "/queryBindingUserInfo",
            get(register::query_binding_user_info),
        )
        .route("/registerUser", post(register::register_user))
        .route("/login", post(register::login));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/register", register_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
