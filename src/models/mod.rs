//! Data models for registration, login and directory queries.

pub mod user;

pub use user::*;
