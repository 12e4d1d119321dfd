//! Credential hashing used by the user directory.

mod password;

pub use password::PasswordService;
