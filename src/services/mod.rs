//! Business logic: the email verification and registration flow.

pub mod verification;

pub use verification::{CodeMailTemplate, VerificationService};
